use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use pasaje_core::{BaggageReservation, BaggageType};
use serde::{Deserialize, Serialize};
use crate::error::{parse_count, AppError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BaggageTypesQuery {
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AddBaggageRequest {
    pub baggage_reservation_id: String,
    pub baggage_type: String,
    pub quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct CreateBaggageReservationResponse {
    pub baggage_reservation_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PriceQuery {
    pub baggage_type: String,
    pub quantity: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PriceResponse {
    pub price: f64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/baggage/types", get(get_baggage_types))
        .route("/baggage/add", post(add_baggage))
        .route("/baggage/reserve", post(create_baggage_reservation))
        .route("/baggage/price", get(calculate_price))
        .route("/baggage/reservations/{id}", get(get_baggage_reservation))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /baggage/types?name=..
async fn get_baggage_types(
    State(state): State<AppState>,
    query: Result<Query<BaggageTypesQuery>, QueryRejection>,
) -> Result<Json<Vec<BaggageType>>, AppError> {
    let Query(query) = query?;
    let types = state.baggage.lookup_baggage_types(query.name.as_deref()).await?;
    Ok(Json(types))
}

/// POST /baggage/add
async fn add_baggage(
    State(state): State<AppState>,
    payload: Result<Json<AddBaggageRequest>, JsonRejection>,
) -> Result<Json<BaggageReservation>, AppError> {
    let Json(req) = payload?;
    let quantity = parse_count("quantity", req.quantity)?;

    let updated = state
        .baggage
        .add_baggage_to_reservation(&req.baggage_reservation_id, &req.baggage_type, quantity)
        .await?;
    Ok(Json(updated))
}

/// POST /baggage/reserve
async fn create_baggage_reservation(
    State(state): State<AppState>,
    payload: Result<Json<BaggageReservation>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBaggageReservationResponse>), AppError> {
    let Json(reservation) = payload?;
    let baggage_reservation_id = state.baggage.create_baggage_reservation(reservation).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateBaggageReservationResponse { baggage_reservation_id }),
    ))
}

/// GET /baggage/price?baggage_type=..&quantity=..
async fn calculate_price(
    State(state): State<AppState>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<PriceResponse>, AppError> {
    let Query(query) = query?;
    let raw = query.quantity.unwrap_or_default();
    let quantity: u32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::ValidationError(format!("invalid quantity: {:?}", raw)))?;

    let price = state.baggage.calculate_baggage_price(&query.baggage_type, quantity).await?;
    Ok(Json(PriceResponse { price }))
}

/// GET /baggage/reservations/{id}
async fn get_baggage_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BaggageReservation>, AppError> {
    state
        .baggage
        .get_baggage_reservation(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Baggage reservation {} not found", id)))
}
