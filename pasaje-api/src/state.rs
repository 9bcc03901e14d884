use std::sync::Arc;
use std::time::Duration;
use pasaje_catalog::{BaggagePricing, RouteInventory};
use pasaje_order::{BaggageLedger, ReservationLedger};
use pasaje_store::app_config::RateLimitConfig;
use pasaje_store::{RedisClient, Storage};

#[derive(Clone)]
pub struct AppState {
    pub inventory: RouteInventory,
    pub ledger: ReservationLedger,
    pub baggage: BaggageLedger,
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
}

impl AppState {
    /// Wire the core services over `storage`, bounding every storage call by `timeout`.
    pub fn new(storage: &Storage, timeout: Duration) -> Self {
        let inventory = RouteInventory::new(storage.routes.clone()).with_timeout(timeout);
        let ledger = ReservationLedger::new(inventory.clone(), storage.reservations.clone())
            .with_timeout(timeout);
        let pricing = BaggagePricing::new(storage.baggage.clone()).with_timeout(timeout);
        let baggage = BaggageLedger::new(pricing, storage.baggage.clone()).with_timeout(timeout);

        Self {
            inventory,
            ledger,
            baggage,
            redis: None,
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn with_rate_limit(mut self, redis: Arc<RedisClient>, rate_limit: RateLimitConfig) -> Self {
        self.redis = Some(redis);
        self.rate_limit = rate_limit;
        self
    }
}
