use std::sync::Arc;
use std::time::Duration;
use pasaje_core::repository::BaggageRepository;
use pasaje_core::{with_timeout, BaggageType, CoreResult, DEFAULT_STORAGE_TIMEOUT};
use tracing::warn;

/// Price of `quantity` units at `unit_price`.
pub fn quote(unit_price: f64, quantity: u32) -> f64 {
    f64::from(quantity) * unit_price
}

/// Baggage price list lookups.
#[derive(Clone)]
pub struct BaggagePricing {
    baggage: Arc<dyn BaggageRepository>,
    timeout: Duration,
}

impl BaggagePricing {
    pub fn new(baggage: Arc<dyn BaggageRepository>) -> Self {
        Self {
            baggage,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// All baggage types, or only those named `name` when one is given.
    pub async fn lookup_baggage_types(&self, name: Option<&str>) -> CoreResult<Vec<BaggageType>> {
        let name = name.filter(|n| !n.is_empty());
        with_timeout(self.timeout, self.baggage.find_baggage_types(name)).await
    }

    pub async fn find_baggage_type(&self, name: &str) -> CoreResult<Option<BaggageType>> {
        if name.is_empty() {
            return Ok(None);
        }
        let mut types = self.lookup_baggage_types(Some(name)).await?;
        Ok(if types.is_empty() { None } else { Some(types.swap_remove(0)) })
    }

    /// Total for `quantity` units of the named type. An unknown type costs nothing.
    pub async fn calculate_baggage_price(&self, type_name: &str, quantity: u32) -> CoreResult<f64> {
        match self.find_baggage_type(type_name).await? {
            Some(baggage_type) => Ok(quote(baggage_type.price, quantity)),
            None => {
                warn!("Baggage type {} not found, pricing at zero", type_name);
                Ok(0.0)
            }
        }
    }
}
