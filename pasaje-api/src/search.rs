use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use pasaje_core::{Reservation, Route};
use serde::Deserialize;
use tracing::debug;
use crate::error::{parse_count, AppError};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub origin: String,
    pub destination: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReserveRequest {
    pub route_id: String,
    pub user_id: String,
    pub seats: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search", get(search_routes))
        .route("/reserve", post(reserve_route))
        .route("/reservations/{id}", get(get_reservation))
}

/// GET /search?origin=..&destination=..
async fn search_routes(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> Result<Json<Vec<Route>>, AppError> {
    let Query(query) = query?;
    debug!("origin: {}, destination: {}", query.origin, query.destination);

    let routes = state.inventory.find_routes(&query.origin, &query.destination).await?;
    Ok(Json(routes))
}

/// POST /reserve
async fn reserve_route(
    State(state): State<AppState>,
    payload: Result<Json<ReserveRequest>, JsonRejection>,
) -> Result<Json<Reservation>, AppError> {
    let Json(req) = payload?;
    let seats = parse_count("seats", req.seats)?;

    let reservation = state.ledger.reserve_route(&req.route_id, &req.user_id, seats).await?;
    Ok(Json(reservation))
}

/// GET /reservations/{id}
async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Reservation>, AppError> {
    state
        .ledger
        .get_reservation_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFoundError(format!("Reservation {} not found", id)))
}
