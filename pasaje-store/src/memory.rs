use std::collections::HashMap;
use async_trait::async_trait;
use pasaje_core::repository::{BaggageRepository, ReservationRepository, RouteRepository};
use pasaje_core::{
    Baggage, BaggageReservation, BaggageType, CoreError, CoreResult, Reservation, Route, SeatRequest,
};
use tokio::sync::RwLock;

/// Process-local adapter for every storage trait.
///
/// Each conditional mutation runs under the write lock of its collection,
/// which makes it a single atomic step for concurrent callers.
#[derive(Default)]
pub struct MemoryStore {
    routes: RwLock<HashMap<String, Route>>,
    reservations: RwLock<HashMap<String, Reservation>>,
    baggage_reservations: RwLock<HashMap<String, BaggageReservation>>,
    baggage_types: RwLock<Vec<BaggageType>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reprice a route outside the reservation flow (administration).
    pub async fn set_route_price(&self, id: &str, price: f64) -> bool {
        match self.routes.write().await.get_mut(id) {
            Some(route) => {
                route.price = price;
                true
            }
            None => false,
        }
    }

    pub async fn reservation_count(&self) -> usize {
        self.reservations.read().await.len()
    }
}

#[async_trait]
impl RouteRepository for MemoryStore {
    async fn find_routes(&self, origin: &str, destination: &str) -> CoreResult<Vec<Route>> {
        let routes = self.routes.read().await;
        let mut found: Vec<Route> = routes
            .values()
            .filter(|r| r.matches(origin, destination) && r.seats > 0)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.departure.cmp(&b.departure).then_with(|| a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn get_route(&self, id: &str) -> CoreResult<Option<Route>> {
        Ok(self.routes.read().await.get(id).cloned())
    }

    async fn reserve_seats(&self, id: &str, seats: u32) -> CoreResult<Option<Route>> {
        let mut routes = self.routes.write().await;
        match routes.get_mut(id) {
            Some(route) if route.has_capacity(seats) => {
                let snapshot = route.clone();
                route.seats -= seats;
                Ok(Some(snapshot))
            }
            _ => Ok(None),
        }
    }

    async fn insert_route(&self, route: &Route) -> CoreResult<()> {
        let mut routes = self.routes.write().await;
        if routes.contains_key(&route.id) {
            return Err(CoreError::InvalidInput(format!("Route {} already exists", route.id)));
        }
        routes.insert(route.id.clone(), route.clone());
        Ok(())
    }
}

#[async_trait]
impl ReservationRepository for MemoryStore {
    async fn reserve_and_record(&self, request: &SeatRequest) -> CoreResult<Option<Reservation>> {
        // Lock order: routes, then reservations.
        let mut routes = self.routes.write().await;
        let mut reservations = self.reservations.write().await;
        if reservations.contains_key(&request.reservation_id) {
            return Err(CoreError::InvalidInput(format!(
                "Reservation {} already exists",
                request.reservation_id
            )));
        }

        let route = match routes.get_mut(&request.route_id) {
            Some(route) if route.has_capacity(request.seats) => route,
            _ => return Ok(None),
        };
        let reservation = request.confirm(route);
        route.seats -= request.seats;
        reservations.insert(reservation.id.clone(), reservation.clone());
        Ok(Some(reservation))
    }

    async fn get_reservation(&self, id: &str) -> CoreResult<Option<Reservation>> {
        Ok(self.reservations.read().await.get(id).cloned())
    }
}

#[async_trait]
impl BaggageRepository for MemoryStore {
    async fn insert_baggage_reservation(&self, reservation: &BaggageReservation) -> CoreResult<()> {
        let mut reservations = self.baggage_reservations.write().await;
        if reservations.contains_key(&reservation.id) {
            return Err(CoreError::InvalidInput(format!(
                "Baggage reservation {} already exists",
                reservation.id
            )));
        }
        reservations.insert(reservation.id.clone(), reservation.clone());
        Ok(())
    }

    async fn get_baggage_reservation(&self, id: &str) -> CoreResult<Option<BaggageReservation>> {
        Ok(self.baggage_reservations.read().await.get(id).cloned())
    }

    async fn append_baggage(
        &self,
        id: &str,
        item: &Baggage,
        added_price: f64,
    ) -> CoreResult<Option<BaggageReservation>> {
        let mut reservations = self.baggage_reservations.write().await;
        Ok(reservations.get_mut(id).map(|reservation| {
            reservation.append(item.clone(), added_price);
            reservation.clone()
        }))
    }

    async fn find_baggage_types(&self, name: Option<&str>) -> CoreResult<Vec<BaggageType>> {
        let types = self.baggage_types.read().await;
        Ok(types
            .iter()
            .filter(|t| name.map_or(true, |n| t.name == n))
            .cloned()
            .collect())
    }

    async fn insert_baggage_type(&self, baggage_type: &BaggageType) -> CoreResult<()> {
        let mut types = self.baggage_types.write().await;
        if types.iter().any(|t| t.name == baggage_type.name) {
            return Err(CoreError::InvalidInput(format!(
                "Baggage type {} already exists",
                baggage_type.name
            )));
        }
        types.push(baggage_type.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::new_route;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_reserve_seats_is_conditional() {
        let store = MemoryStore::new();
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 3, 50.0);
        store.insert_route(&route).await.unwrap();

        assert!(store.reserve_seats(&route.id, 4).await.unwrap().is_none());
        let snapshot = store.reserve_seats(&route.id, 3).await.unwrap().unwrap();
        assert_eq!(snapshot.seats, 3);
        assert!(store.reserve_seats(&route.id, 1).await.unwrap().is_none());
        assert!(store.reserve_seats("missing", 1).await.unwrap().is_none());

        // Sold out routes drop out of search
        assert!(store.find_routes("Lima", "Cusco").await.unwrap().is_empty());
    }

    fn seat_request(reservation_id: &str, route_id: &str, seats: u32) -> SeatRequest {
        SeatRequest {
            reservation_id: reservation_id.to_string(),
            route_id: route_id.to_string(),
            user_id: "user-a".to_string(),
            seats,
        }
    }

    #[tokio::test]
    async fn test_reserve_and_record_writes_both_or_nothing() {
        let store = MemoryStore::new();
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 3, 50.0);
        store.insert_route(&route).await.unwrap();

        let reservation = store.reserve_and_record(&seat_request("res-1", &route.id, 2)).await.unwrap().unwrap();
        assert_eq!(reservation.total_price, 100.0);
        assert_eq!(store.get_reservation("res-1").await.unwrap(), Some(reservation));
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 1);

        // Short on seats, unknown route and a reused id leave both collections alone
        assert!(store.reserve_and_record(&seat_request("res-2", &route.id, 2)).await.unwrap().is_none());
        assert!(store.reserve_and_record(&seat_request("res-3", "missing", 1)).await.unwrap().is_none());
        let reused = store.reserve_and_record(&seat_request("res-1", &route.id, 1)).await;
        assert!(matches!(reused, Err(CoreError::InvalidInput(_))));

        assert_eq!(store.reservation_count().await, 1);
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 1);
    }

    #[tokio::test]
    async fn test_duplicate_inserts_rejected() {
        let store = MemoryStore::new();
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 3, 50.0);
        store.insert_route(&route).await.unwrap();
        assert!(matches!(store.insert_route(&route).await, Err(CoreError::InvalidInput(_))));

        let baggage_type = BaggageType { id: "t1".to_string(), name: "Maleta grande".to_string(), price: 30.0 };
        store.insert_baggage_type(&baggage_type).await.unwrap();
        let same_name = BaggageType { id: "t2".to_string(), ..baggage_type };
        assert!(matches!(store.insert_baggage_type(&same_name).await, Err(CoreError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_append_missing_reservation() {
        let store = MemoryStore::new();
        let item = Baggage { quantity: 1, baggage_type: "Maleta grande".to_string() };
        assert!(store.append_baggage("missing", &item, 30.0).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_keep_every_item() {
        let store = Arc::new(MemoryStore::new());
        let reservation = BaggageReservation { id: "bag-1".to_string(), ..Default::default() };
        store.insert_baggage_reservation(&reservation).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let item = Baggage { quantity: 1, baggage_type: format!("item-{}", i) };
                    store.append_baggage("bag-1", &item, 10.0).await
                })
            })
            .collect();
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap().unwrap();
        }

        let stored = store.get_baggage_reservation("bag-1").await.unwrap().unwrap();
        assert_eq!(stored.baggage.len(), 50);
        assert_eq!(stored.price, 500.0);
        assert_eq!(stored.weight, 50.0);
    }
}
