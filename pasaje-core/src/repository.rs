use async_trait::async_trait;
use crate::baggage::{Baggage, BaggageReservation, BaggageType};
use crate::search::{Reservation, Route, SeatRequest};
use crate::CoreResult;

/// Storage capability for route records.
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Routes between the two cities that still have seats.
    async fn find_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<Route>>;

    async fn get_route(
        &self,
        id: &str,
    ) -> CoreResult<Option<Route>>;

    /// Compare-and-decrement: reduce `seats` only if at least `seats` remain.
    /// Returns the route as it was before the decrement, or `None` when the
    /// route is missing or short on capacity.
    async fn reserve_seats(
        &self,
        id: &str,
        seats: u32,
    ) -> CoreResult<Option<Route>>;

    async fn insert_route(
        &self,
        route: &Route,
    ) -> CoreResult<()>;
}

/// Storage capability for seat reservations.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Take the requested seats and record the confirmed reservation as one
    /// unit: either both land or neither does. Returns `None`, with nothing
    /// written, when the route is missing or short on capacity.
    async fn reserve_and_record(
        &self,
        request: &SeatRequest,
    ) -> CoreResult<Option<Reservation>>;

    async fn get_reservation(
        &self,
        id: &str,
    ) -> CoreResult<Option<Reservation>>;
}

/// Storage capability for baggage reservations and the baggage price list.
#[async_trait]
pub trait BaggageRepository: Send + Sync {
    async fn insert_baggage_reservation(
        &self,
        reservation: &BaggageReservation,
    ) -> CoreResult<()>;

    async fn get_baggage_reservation(
        &self,
        id: &str,
    ) -> CoreResult<Option<BaggageReservation>>;

    /// Atomically append `item`, add `added_price` to the price and the item
    /// quantity to the weight. Returns the updated record, or `None` if it
    /// does not exist.
    async fn append_baggage(
        &self,
        id: &str,
        item: &Baggage,
        added_price: f64,
    ) -> CoreResult<Option<BaggageReservation>>;

    /// All types when `name` is `None`, otherwise the types with that exact name.
    async fn find_baggage_types(
        &self,
        name: Option<&str>,
    ) -> CoreResult<Vec<BaggageType>>;

    async fn insert_baggage_type(
        &self,
        baggage_type: &BaggageType,
    ) -> CoreResult<()>;
}
