use async_trait::async_trait;
use pasaje_core::repository::BaggageRepository;
use pasaje_core::{Baggage, BaggageReservation, BaggageType, CoreResult};
use sqlx::types::Json;
use sqlx::PgPool;
use crate::database::storage_error;

pub struct PostgresBaggageRepository {
    pool: PgPool,
}

impl PostgresBaggageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct BaggageReservationRow {
    id: String,
    reservation_id: String,
    weight: f64,
    price: f64,
    #[sqlx(rename = "type")]
    baggage_type: String,
    baggage: Json<Vec<Baggage>>,
}

impl From<BaggageReservationRow> for BaggageReservation {
    fn from(row: BaggageReservationRow) -> Self {
        BaggageReservation {
            id: row.id,
            reservation_id: row.reservation_id,
            weight: row.weight,
            price: row.price,
            baggage_type: row.baggage_type,
            baggage: row.baggage.0,
        }
    }
}

#[derive(sqlx::FromRow)]
struct BaggageTypeRow {
    id: String,
    name: String,
    price: f64,
}

impl From<BaggageTypeRow> for BaggageType {
    fn from(row: BaggageTypeRow) -> Self {
        BaggageType {
            id: row.id,
            name: row.name,
            price: row.price,
        }
    }
}

#[async_trait]
impl BaggageRepository for PostgresBaggageRepository {
    async fn insert_baggage_reservation(
        &self,
        reservation: &BaggageReservation,
    ) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO baggage_reservations (id, reservation_id, weight, price, type, baggage)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&reservation.id)
        .bind(&reservation.reservation_id)
        .bind(reservation.weight)
        .bind(reservation.price)
        .bind(&reservation.baggage_type)
        .bind(Json(&reservation.baggage))
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn get_baggage_reservation(
        &self,
        id: &str,
    ) -> CoreResult<Option<BaggageReservation>> {
        let row = sqlx::query_as::<_, BaggageReservationRow>(
            "SELECT id, reservation_id, weight, price, type, baggage FROM baggage_reservations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(BaggageReservation::from))
    }

    async fn append_baggage(
        &self,
        id: &str,
        item: &Baggage,
        added_price: f64,
    ) -> CoreResult<Option<BaggageReservation>> {
        // One statement: the row lock serializes concurrent appends.
        let row = sqlx::query_as::<_, BaggageReservationRow>(
            r#"
            UPDATE baggage_reservations
            SET baggage = baggage || $2,
                price = price + $3,
                weight = weight + $4
            WHERE id = $1
            RETURNING id, reservation_id, weight, price, type, baggage
            "#,
        )
        .bind(id)
        .bind(Json([item]))
        .bind(added_price)
        .bind(f64::from(item.quantity))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(BaggageReservation::from))
    }

    async fn find_baggage_types(
        &self,
        name: Option<&str>,
    ) -> CoreResult<Vec<BaggageType>> {
        let rows = sqlx::query_as::<_, BaggageTypeRow>(
            "SELECT id, name, price FROM baggage_types WHERE ($1::TEXT IS NULL OR name = $1) ORDER BY name",
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(BaggageType::from).collect())
    }

    async fn insert_baggage_type(
        &self,
        baggage_type: &BaggageType,
    ) -> CoreResult<()> {
        sqlx::query("INSERT INTO baggage_types (id, name, price) VALUES ($1, $2, $3)")
            .bind(&baggage_type.id)
            .bind(&baggage_type.name)
            .bind(baggage_type.price)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(())
    }
}
