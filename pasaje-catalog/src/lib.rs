pub mod pricing;
pub mod inventory;

pub use pricing::BaggagePricing;
pub use inventory::{check_seat_request, RouteInventory};
