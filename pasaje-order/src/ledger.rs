use std::sync::Arc;
use std::time::Duration;
use pasaje_catalog::{check_seat_request, RouteInventory};
use pasaje_core::repository::ReservationRepository;
use pasaje_core::{
    new_id, with_timeout, CoreError, CoreResult, Reservation, SeatRequest, DEFAULT_STORAGE_TIMEOUT,
};
use tracing::{error, info};

/// Books seats on a route and records the reservation.
///
/// The seat decrement and the insert are one storage unit, so a reservation
/// exists exactly when its seats are taken. A timeout leaves the outcome
/// unknown but never half-applied.
#[derive(Clone)]
pub struct ReservationLedger {
    inventory: RouteInventory,
    reservations: Arc<dyn ReservationRepository>,
    timeout: Duration,
}

impl ReservationLedger {
    pub fn new(inventory: RouteInventory, reservations: Arc<dyn ReservationRepository>) -> Self {
        Self {
            inventory,
            reservations,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn reserve_route(&self, route_id: &str, user_id: &str, seats: u32) -> CoreResult<Reservation> {
        check_seat_request(route_id, seats)?;
        if user_id.is_empty() {
            return Err(CoreError::InvalidInput("user_id is required".to_string()));
        }

        let request = SeatRequest {
            reservation_id: new_id(),
            route_id: route_id.to_string(),
            user_id: user_id.to_string(),
            seats,
        };

        let recorded = with_timeout(self.timeout, self.reservations.reserve_and_record(&request))
            .await
            .map_err(|e| {
                error!("Failed to reserve {} seats on route {}: {}", seats, route_id, e);
                e
            })?;

        match recorded {
            Some(reservation) => {
                info!(
                    "Reservation confirmed: {} ({} seats on route {} for {})",
                    reservation.id, seats, route_id, user_id
                );
                Ok(reservation)
            }
            // Nothing was written; the inventory tells missing from sold out.
            None => Err(self.inventory.shortfall(route_id, seats).await),
        }
    }

    /// Point lookup; a missing reservation is `None`.
    pub async fn get_reservation_by_id(&self, id: &str) -> CoreResult<Option<Reservation>> {
        if id.is_empty() {
            return Ok(None);
        }
        with_timeout(self.timeout, self.reservations.get_reservation(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pasaje_core::repository::RouteRepository;
    use pasaje_core::{ReservationStatus, Route};
    use pasaje_store::seed::new_route;
    use pasaje_store::MemoryStore;

    async fn ledger_with(route: &Route) -> (Arc<MemoryStore>, ReservationLedger) {
        let store = Arc::new(MemoryStore::new());
        store.insert_route(route).await.unwrap();
        let ledger = ReservationLedger::new(RouteInventory::new(store.clone()), store.clone());
        (store, ledger)
    }

    #[tokio::test]
    async fn test_reserve_route_confirms_and_prices() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 10, 50.0);
        let (store, ledger) = ledger_with(&route).await;

        let reservation = ledger.reserve_route(&route.id, "user-a", 3).await.unwrap();
        assert_eq!(reservation.status, ReservationStatus::Confirmed);
        assert_eq!(reservation.total_price, 150.0);
        assert_eq!(reservation.seats, 3);

        let stored = ledger.get_reservation_by_id(&reservation.id).await.unwrap().unwrap();
        assert_eq!(stored, reservation);
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 7);
    }

    #[tokio::test]
    async fn test_total_price_frozen_at_booking_time() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 10, 50.0);
        let (store, ledger) = ledger_with(&route).await;

        let reservation = ledger.reserve_route(&route.id, "user-a", 2).await.unwrap();
        assert!(store.set_route_price(&route.id, 75.0).await);

        let stored = ledger.get_reservation_by_id(&reservation.id).await.unwrap().unwrap();
        assert_eq!(stored.total_price, 100.0);

        let later = ledger.reserve_route(&route.id, "user-b", 2).await.unwrap();
        assert_eq!(later.total_price, 150.0);
    }

    #[tokio::test]
    async fn test_failed_seat_step_creates_nothing() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 1, 50.0);
        let (store, ledger) = ledger_with(&route).await;

        let result = ledger.reserve_route(&route.id, "user-a", 2).await;
        assert!(matches!(result, Err(CoreError::Unavailable(_))));
        assert_eq!(store.reservation_count().await, 0);

        let missing = ledger.reserve_route("missing", "user-a", 1).await;
        assert!(matches!(missing, Err(CoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reserve_route_rejects_bad_input() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 5, 50.0);
        let (store, ledger) = ledger_with(&route).await;

        assert!(matches!(ledger.reserve_route(&route.id, "", 1).await, Err(CoreError::InvalidInput(_))));
        assert!(matches!(ledger.reserve_route(&route.id, "user-a", 0).await, Err(CoreError::InvalidInput(_))));
        assert!(matches!(ledger.reserve_route("", "user-a", 1).await, Err(CoreError::InvalidInput(_))));
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 5);
    }

    #[tokio::test]
    async fn test_get_reservation_missing_is_none() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 5, 50.0);
        let (_, ledger) = ledger_with(&route).await;
        assert!(ledger.get_reservation_by_id("nope").await.unwrap().is_none());
        assert!(ledger.get_reservation_by_id("").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_race_for_last_seats() {
        for _ in 0..20 {
            let route = new_route("Lima", "LIM", "Cusco", "CUZ", 2, 50.0);
            let (store, ledger) = ledger_with(&route).await;

            let a = {
                let ledger = ledger.clone();
                let id = route.id.clone();
                tokio::spawn(async move { ledger.reserve_route(&id, "user-a", 2).await })
            };
            let b = {
                let ledger = ledger.clone();
                let id = route.id.clone();
                tokio::spawn(async move { ledger.reserve_route(&id, "user-b", 1).await })
            };

            let results = vec![a.await.unwrap(), b.await.unwrap()];
            let winners: Vec<&Reservation> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
            let losers = results
                .iter()
                .filter(|r| matches!(r, Err(CoreError::Unavailable(_))))
                .count();

            assert_eq!(winners.len(), 1);
            assert_eq!(losers, 1);

            let seats_left = store.get_route(&route.id).await.unwrap().unwrap().seats;
            assert_eq!(seats_left, 2 - winners[0].seats);
            assert_eq!(winners[0].total_price, f64::from(winners[0].seats) * 50.0);
        }
    }

    struct BrokenReservations;

    #[async_trait]
    impl ReservationRepository for BrokenReservations {
        async fn reserve_and_record(&self, _: &SeatRequest) -> CoreResult<Option<Reservation>> {
            Err(CoreError::StorageUnavailable("connection reset".to_string()))
        }
        async fn get_reservation(&self, _: &str) -> CoreResult<Option<Reservation>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_storage_failure_is_returned_as_is() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 4, 50.0);
        let store = Arc::new(MemoryStore::new());
        store.insert_route(&route).await.unwrap();
        let ledger = ReservationLedger::new(RouteInventory::new(store.clone()), Arc::new(BrokenReservations));

        let result = ledger.reserve_route(&route.id, "user-a", 3).await;
        assert!(matches!(result, Err(CoreError::StorageUnavailable(_))));
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 4);
    }

    /// Commits through the real store, then stalls before answering.
    struct CommitThenStall {
        store: Arc<MemoryStore>,
    }

    #[async_trait]
    impl ReservationRepository for CommitThenStall {
        async fn reserve_and_record(&self, request: &SeatRequest) -> CoreResult<Option<Reservation>> {
            let recorded = self.store.reserve_and_record(request).await?;
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(recorded)
        }
        async fn get_reservation(&self, id: &str) -> CoreResult<Option<Reservation>> {
            self.store.get_reservation(id).await
        }
    }

    #[tokio::test]
    async fn test_timeout_after_commit_never_oversells() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 1, 50.0);
        let store = Arc::new(MemoryStore::new());
        store.insert_route(&route).await.unwrap();
        let inventory = RouteInventory::new(store.clone());

        let stalled = ReservationLedger::new(inventory.clone(), Arc::new(CommitThenStall { store: store.clone() }))
            .with_timeout(Duration::from_millis(20));
        let result = stalled.reserve_route(&route.id, "user-a", 1).await;
        assert!(matches!(result, Err(CoreError::StorageTimeout(_))));

        // The committed booking keeps its seat, so the next caller is refused.
        let ledger = ReservationLedger::new(inventory, store.clone());
        let second = ledger.reserve_route(&route.id, "user-b", 1).await;
        assert!(matches!(second, Err(CoreError::Unavailable(_))));

        assert_eq!(store.reservation_count().await, 1);
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 0);
    }

    struct SlowReservations;

    #[async_trait]
    impl ReservationRepository for SlowReservations {
        async fn reserve_and_record(&self, _: &SeatRequest) -> CoreResult<Option<Reservation>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
        async fn get_reservation(&self, _: &str) -> CoreResult<Option<Reservation>> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_storage_timeout_surfaces() {
        let route = new_route("Lima", "LIM", "Cusco", "CUZ", 4, 50.0);
        let store = Arc::new(MemoryStore::new());
        store.insert_route(&route).await.unwrap();
        let ledger = ReservationLedger::new(RouteInventory::new(store.clone()), Arc::new(SlowReservations))
            .with_timeout(Duration::from_millis(20));

        let result = ledger.reserve_route(&route.id, "user-a", 1).await;
        assert!(matches!(result, Err(CoreError::StorageTimeout(_))));
        assert_eq!(store.get_route(&route.id).await.unwrap().unwrap().seats, 4);

        let lookup = ledger.get_reservation_by_id("res-1").await;
        assert!(matches!(lookup, Err(CoreError::StorageTimeout(_))));
    }
}
