use std::sync::Arc;
use std::time::Duration;
use pasaje_core::repository::RouteRepository;
use pasaje_core::{with_timeout, CoreError, CoreResult, Route, DEFAULT_STORAGE_TIMEOUT};
use tracing::{debug, info, warn};

/// Route search and the seat-decrement transition.
///
/// All mutation goes through the repository's conditional decrement, so two
/// callers racing for the last seats can never push a route below zero.
#[derive(Clone)]
pub struct RouteInventory {
    routes: Arc<dyn RouteRepository>,
    timeout: Duration,
}

impl RouteInventory {
    pub fn new(routes: Arc<dyn RouteRepository>) -> Self {
        Self {
            routes,
            timeout: DEFAULT_STORAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Routes between two cities with at least one seat left. No match is an empty list.
    pub async fn find_routes(&self, origin: &str, destination: &str) -> CoreResult<Vec<Route>> {
        debug!("Searching routes {} -> {}", origin, destination);
        with_timeout(self.timeout, self.routes.find_routes(origin, destination)).await
    }

    pub async fn get_route(&self, route_id: &str) -> CoreResult<Option<Route>> {
        with_timeout(self.timeout, self.routes.get_route(route_id)).await
    }

    /// Take `seats` from a route and return the route as it was before.
    pub async fn reserve_seats(&self, route_id: &str, seats: u32) -> CoreResult<Route> {
        check_seat_request(route_id, seats)?;

        let snapshot = with_timeout(self.timeout, self.routes.reserve_seats(route_id, seats)).await?;
        match snapshot {
            Some(route) => {
                info!("Reserved {} seats on route {} ({} left)", seats, route_id, route.seats - seats);
                Ok(route)
            }
            None => Err(self.shortfall(route_id, seats).await),
        }
    }

    /// Error for a seat request the storage guard refused.
    ///
    /// The refusal already happened; this read only picks the error kind.
    pub async fn shortfall(&self, route_id: &str, seats: u32) -> CoreError {
        match self.get_route(route_id).await {
            Err(e) => e,
            Ok(None) => CoreError::NotFound(format!("Route {} not found", route_id)),
            Ok(Some(route)) => {
                warn!("Route {} short on seats: requested {}, available {}", route_id, seats, route.seats);
                CoreError::Unavailable(format!(
                    "Insufficient seats on route {}: requested {}, available {}",
                    route_id, seats, route.seats
                ))
            }
        }
    }
}

pub fn check_seat_request(route_id: &str, seats: u32) -> CoreResult<()> {
    if route_id.is_empty() {
        return Err(CoreError::InvalidInput("route_id is required".to_string()));
    }
    if seats == 0 {
        return Err(CoreError::InvalidInput("seats must be greater than zero".to_string()));
    }
    Ok(())
}
