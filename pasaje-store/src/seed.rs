use chrono::{Duration, Utc};
use pasaje_core::repository::{BaggageRepository, RouteRepository};
use pasaje_core::{new_id, BaggageType, CoreResult, Route};
use tracing::info;

/// Cities served by the demo network, with their short codes.
pub const DEMO_CITIES: [(&str, &str); 8] = [
    ("Lima", "LIM"),
    ("Cusco", "CUZ"),
    ("Arequipa", "AQP"),
    ("Trujillo", "TRU"),
    ("Iquitos", "IQT"),
    ("Piura", "PIU"),
    ("Tacna", "TCQ"),
    ("Pucallpa", "PCL"),
];

const DEMO_SEATS: u32 = 100;
const DEMO_PRICE: f64 = 50.0;

/// A route leaving in 24 hours and arriving two hours later.
pub fn new_route(
    origin: &str,
    origin_code: &str,
    destination: &str,
    dest_code: &str,
    seats: u32,
    price: f64,
) -> Route {
    let departure = Utc::now() + Duration::hours(24);
    Route {
        id: new_id(),
        origin: origin.to_string(),
        origin_code: origin_code.to_string(),
        destination: destination.to_string(),
        dest_code: dest_code.to_string(),
        departure,
        arrival: departure + Duration::hours(2),
        seats,
        price,
    }
}

/// One route per pair of demo cities, in list order.
pub fn demo_routes() -> Vec<Route> {
    let mut routes = Vec::new();
    for (i, (origin, origin_code)) in DEMO_CITIES.iter().enumerate() {
        for (destination, dest_code) in DEMO_CITIES.iter().skip(i + 1) {
            routes.push(new_route(origin, origin_code, destination, dest_code, DEMO_SEATS, DEMO_PRICE));
        }
    }
    routes
}

pub fn demo_baggage_types() -> Vec<BaggageType> {
    [("Maleta pequeña", 10.0), ("Maleta mediana", 20.0), ("Maleta grande", 30.0)]
        .into_iter()
        .map(|(name, price)| BaggageType {
            id: new_id(),
            name: name.to_string(),
            price,
        })
        .collect()
}

pub async fn seed_baggage_types(baggage: &dyn BaggageRepository) -> CoreResult<()> {
    for baggage_type in demo_baggage_types() {
        baggage.insert_baggage_type(&baggage_type).await?;
    }
    Ok(())
}

/// Load the demo network into an empty store. Returns `false` if the store
/// already holds a baggage price list and was left alone.
pub async fn seed_demo_data(routes: &dyn RouteRepository, baggage: &dyn BaggageRepository) -> CoreResult<bool> {
    if !baggage.find_baggage_types(None).await?.is_empty() {
        info!("Store already seeded, skipping demo data");
        return Ok(false);
    }

    seed_baggage_types(baggage).await?;

    let demo = demo_routes();
    for route in &demo {
        routes.insert_route(route).await?;
    }

    info!("Seeded {} routes and the baggage price list", demo.len());
    Ok(true)
}
