use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pasaje_core::repository::RouteRepository;
use pasaje_core::{CoreResult, Route};
use sqlx::PgPool;
use tracing::debug;
use crate::database::{from_db_count, storage_error, to_db_count};

pub struct PostgresRouteRepository {
    pool: PgPool,
}

impl PostgresRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Guarded decrement; RETURNING hands back the pre-decrement count.
pub(crate) const RESERVE_SEATS_SQL: &str = r#"
    UPDATE routes
    SET seats = seats - $2
    WHERE id = $1 AND seats >= $2
    RETURNING id, origin, origin_code, destination, dest_code, departure, arrival,
              seats + $2 AS seats, price
"#;

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
pub(crate) struct RouteRow {
    id: String,
    origin: String,
    origin_code: String,
    destination: String,
    dest_code: String,
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
    seats: i32,
    price: f64,
}

impl From<RouteRow> for Route {
    fn from(row: RouteRow) -> Self {
        Route {
            id: row.id,
            origin: row.origin,
            origin_code: row.origin_code,
            destination: row.destination,
            dest_code: row.dest_code,
            departure: row.departure,
            arrival: row.arrival,
            seats: from_db_count(row.seats),
            price: row.price,
        }
    }
}

#[async_trait]
impl RouteRepository for PostgresRouteRepository {
    async fn find_routes(
        &self,
        origin: &str,
        destination: &str,
    ) -> CoreResult<Vec<Route>> {
        debug!("Route filter: origin={} destination={} seats>0", origin, destination);
        let rows = sqlx::query_as::<_, RouteRow>(
            r#"
            SELECT id, origin, origin_code, destination, dest_code, departure, arrival, seats, price
            FROM routes
            WHERE origin = $1 AND destination = $2 AND seats > 0
            ORDER BY departure, id
            "#,
        )
        .bind(origin)
        .bind(destination)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(Route::from).collect())
    }

    async fn get_route(
        &self,
        id: &str,
    ) -> CoreResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>(
            "SELECT id, origin, origin_code, destination, dest_code, departure, arrival, seats, price FROM routes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(Route::from))
    }

    async fn reserve_seats(
        &self,
        id: &str,
        seats: u32,
    ) -> CoreResult<Option<Route>> {
        let seats = to_db_count(seats)?;

        let row = sqlx::query_as::<_, RouteRow>(RESERVE_SEATS_SQL)
            .bind(id)
            .bind(seats)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(row.map(Route::from))
    }

    async fn insert_route(
        &self,
        route: &Route,
    ) -> CoreResult<()> {
        let seats = to_db_count(route.seats)?;
        sqlx::query(
            r#"
            INSERT INTO routes (id, origin, origin_code, destination, dest_code, departure, arrival, seats, price)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(&route.id)
        .bind(&route.origin)
        .bind(&route.origin_code)
        .bind(&route.destination)
        .bind(&route.dest_code)
        .bind(route.departure)
        .bind(route.arrival)
        .bind(seats)
        .bind(route.price)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}
