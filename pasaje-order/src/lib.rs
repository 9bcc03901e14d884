pub mod ledger;
pub mod baggage;

pub use ledger::ReservationLedger;
pub use baggage::BaggageLedger;
