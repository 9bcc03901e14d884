use pasaje_core::CoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::info;

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(
        connection_string: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }
}

/// Map a driver error onto the core taxonomy.
pub(crate) fn storage_error(err: sqlx::Error) -> CoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            CoreError::InvalidInput(db.message().to_string())
        }
        _ => {
            tracing::error!("Database error: {}", err);
            CoreError::StorageUnavailable(err.to_string())
        }
    }
}

/// Postgres INTEGER columns are signed; reject counts that do not fit.
pub(crate) fn to_db_count(value: u32) -> Result<i32, CoreError> {
    i32::try_from(value).map_err(|_| CoreError::InvalidInput(format!("{} is out of range", value)))
}

pub(crate) fn from_db_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}
