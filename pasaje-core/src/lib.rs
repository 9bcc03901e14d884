pub mod search;
pub mod baggage;
pub mod repository;

use std::future::Future;
use std::time::Duration;

pub use baggage::{Baggage, BaggageReservation, BaggageType};
pub use search::{Reservation, ReservationStatus, Route, SeatRequest};

/// Default bound for a single storage round-trip.
pub const DEFAULT_STORAGE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unavailable: {0}")]
    Unavailable(String),
    #[error("Validation failed: {0}")]
    InvalidInput(String),
    #[error("Storage timed out after {0:?}")]
    StorageTimeout(Duration),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Run a storage call, failing with `StorageTimeout` if it does not finish within `limit`.
pub async fn with_timeout<T, F>(limit: Duration, fut: F) -> CoreResult<T>
where
    F: Future<Output = CoreResult<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Storage call exceeded {:?}", limit);
            Err(CoreError::StorageTimeout(limit))
        }
    }
}

/// Fresh opaque identifier for new records.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
