use std::sync::Arc;
use std::time::Duration;
use pasaje_core::repository::{BaggageRepository, ReservationRepository, RouteRepository};
use pasaje_core::CoreError;
use tracing::info;
use crate::app_config::{Config, StorageBackend};
use crate::baggage_repo::PostgresBaggageRepository;
use crate::database::DbClient;
use crate::memory::MemoryStore;
use crate::reservation_repo::PostgresReservationRepository;
use crate::route_repo::PostgresRouteRepository;
use crate::seed::seed_demo_data;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database.url is required for the postgres backend")]
    MissingDatabaseUrl,
    #[error("Database connection failed: {0}")]
    Connect(#[from] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("Seeding failed: {0}")]
    Seed(#[from] CoreError),
}

/// The three repositories the core is wired with.
#[derive(Clone)]
pub struct Storage {
    pub routes: Arc<dyn RouteRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub baggage: Arc<dyn BaggageRepository>,
}

impl Storage {
    /// One shared in-memory store behind all three traits.
    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            routes: store.clone(),
            reservations: store.clone(),
            baggage: store,
        }
    }

    pub fn postgres(db: &DbClient) -> Self {
        Self {
            routes: Arc::new(PostgresRouteRepository::new(db.pool.clone())),
            reservations: Arc::new(PostgresReservationRepository::new(db.pool.clone())),
            baggage: Arc::new(PostgresBaggageRepository::new(db.pool.clone())),
        }
    }

    /// Build the configured backend, migrating and seeding as requested.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let storage = match config.storage.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage");
                Self::memory(Arc::new(MemoryStore::new()))
            }
            StorageBackend::Postgres => {
                let url = config.database.url.as_deref().ok_or(StoreError::MissingDatabaseUrl)?;
                let db = DbClient::new(
                    url,
                    config.database.max_connections,
                    Duration::from_secs(config.database.acquire_timeout_seconds),
                )
                .await?;
                info!("Connected to PostgreSQL");
                db.migrate().await?;
                Self::postgres(&db)
            }
        };

        if config.storage.seed_demo_data {
            seed_demo_data(storage.routes.as_ref(), storage.baggage.as_ref()).await?;
        }

        Ok(storage)
    }
}
