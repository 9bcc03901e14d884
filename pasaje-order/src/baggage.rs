use std::sync::Arc;
use std::time::Duration;
use pasaje_catalog::BaggagePricing;
use pasaje_core::repository::BaggageRepository;
use pasaje_core::{
    new_id, with_timeout, Baggage, BaggageReservation, BaggageType, CoreError, CoreResult,
    DEFAULT_STORAGE_TIMEOUT,
};
use tracing::info;

/// Baggage reservations and the baggage-append transition.
#[derive(Clone)]
pub struct BaggageLedger {
    pricing: BaggagePricing,
    baggage: Arc<dyn BaggageRepository>,
    timeout: Duration,
}

impl BaggageLedger {
    pub fn new(pricing: BaggagePricing, baggage: Arc<dyn BaggageRepository>) -> Self {
        Self {
            pricing,
            baggage,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Store a new baggage reservation as given, under a fresh id.
    pub async fn create_baggage_reservation(&self, mut reservation: BaggageReservation) -> CoreResult<String> {
        reservation.id = new_id();
        with_timeout(self.timeout, self.baggage.insert_baggage_reservation(&reservation)).await?;
        info!("Baggage reservation created: {}", reservation.id);
        Ok(reservation.id)
    }

    pub async fn get_baggage_reservation(&self, id: &str) -> CoreResult<Option<BaggageReservation>> {
        if id.is_empty() {
            return Ok(None);
        }
        with_timeout(self.timeout, self.baggage.get_baggage_reservation(id)).await
    }

    pub async fn lookup_baggage_types(&self, name: Option<&str>) -> CoreResult<Vec<BaggageType>> {
        self.pricing.lookup_baggage_types(name).await
    }

    pub async fn calculate_baggage_price(&self, type_name: &str, quantity: u32) -> CoreResult<f64> {
        self.pricing.calculate_baggage_price(type_name, quantity).await
    }

    /// Append `quantity` items of `type_name` and return the updated record.
    ///
    /// The append, price increment and weight increment land as one storage
    /// update, so concurrent additions to the same reservation are all kept.
    pub async fn add_baggage_to_reservation(
        &self,
        reservation_id: &str,
        type_name: &str,
        quantity: u32,
    ) -> CoreResult<BaggageReservation> {
        if reservation_id.is_empty() || type_name.is_empty() || quantity == 0 {
            return Err(CoreError::InvalidInput(
                "baggage_reservation_id, baggage_type and quantity are required".to_string(),
            ));
        }

        if self.get_baggage_reservation(reservation_id).await?.is_none() {
            return Err(CoreError::NotFound(format!("Baggage reservation {} not found", reservation_id)));
        }

        let added_price = self.pricing.calculate_baggage_price(type_name, quantity).await?;
        let item = Baggage {
            quantity,
            baggage_type: type_name.to_string(),
        };

        let updated = with_timeout(
            self.timeout,
            self.baggage.append_baggage(reservation_id, &item, added_price),
        )
        .await?
        .ok_or_else(|| CoreError::NotFound(format!("Baggage reservation {} not found", reservation_id)))?;

        info!(
            "Baggage added to reservation {}: {} x {} (+{:.2})",
            reservation_id, quantity, type_name, added_price
        );
        Ok(updated)
    }
}
