use async_trait::async_trait;
use pasaje_core::repository::ReservationRepository;
use pasaje_core::{CoreError, CoreResult, Reservation, ReservationStatus, Route, SeatRequest};
use sqlx::PgPool;
use crate::database::{from_db_count, storage_error, to_db_count};
use crate::route_repo::{RouteRow, RESERVE_SEATS_SQL};

pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: String,
    route_id: String,
    user_id: String,
    seats: i32,
    total_price: f64,
    status: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = CoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<ReservationStatus>().map_err(CoreError::StorageUnavailable)?;
        Ok(Reservation {
            id: row.id,
            route_id: row.route_id,
            user_id: row.user_id,
            seats: from_db_count(row.seats),
            total_price: row.total_price,
            status,
        })
    }
}

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn reserve_and_record(
        &self,
        request: &SeatRequest,
    ) -> CoreResult<Option<Reservation>> {
        let seats = to_db_count(request.seats)?;

        // Dropping the transaction before commit rolls both statements back.
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let snapshot = sqlx::query_as::<_, RouteRow>(RESERVE_SEATS_SQL)
            .bind(&request.route_id)
            .bind(seats)
            .fetch_optional(&mut *tx)
            .await
            .map_err(storage_error)?;
        let Some(snapshot) = snapshot else {
            return Ok(None);
        };

        let reservation = request.confirm(&Route::from(snapshot));
        sqlx::query(
            r#"
            INSERT INTO reservations (id, route_id, user_id, seats, total_price, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.route_id)
        .bind(&reservation.user_id)
        .bind(seats)
        .bind(reservation.total_price)
        .bind(reservation.status.as_str())
        .execute(&mut *tx)
        .await
        .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;

        Ok(Some(reservation))
    }

    async fn get_reservation(
        &self,
        id: &str,
    ) -> CoreResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            "SELECT id, route_id, user_id, seats, total_price, status FROM reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(Reservation::try_from).transpose()
    }
}
