use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// A scheduled origin -> destination trip with finite seat capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub id: String,
    pub origin: String,
    #[serde(rename = "originCode")]
    pub origin_code: String,
    pub destination: String,
    #[serde(rename = "destCode")]
    pub dest_code: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    /// Remaining capacity.
    pub seats: u32,
    /// Per-seat price.
    pub price: f64,
}

impl Route {
    pub fn has_capacity(&self, seats: u32) -> bool {
        self.seats >= seats
    }

    pub fn matches(&self, origin: &str, destination: &str) -> bool {
        self.origin == origin && self.destination == destination
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl ReservationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Pending => "pending",
            ReservationStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(ReservationStatus::Confirmed),
            "pending" => Ok(ReservationStatus::Pending),
            "cancelled" => Ok(ReservationStatus::Cancelled),
            other => Err(format!("unknown reservation status: {}", other)),
        }
    }
}

/// A booking of N seats on one route, priced when it was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: String,
    pub route_id: String,
    pub user_id: String,
    pub seats: u32,
    pub total_price: f64,
    pub status: ReservationStatus,
}

/// Seats asked for on one route, with the id the reservation will be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatRequest {
    pub reservation_id: String,
    pub route_id: String,
    pub user_id: String,
    pub seats: u32,
}

impl SeatRequest {
    /// Confirmed reservation priced from `snapshot`, the route as it was
    /// before the seats were taken.
    pub fn confirm(&self, snapshot: &Route) -> Reservation {
        Reservation {
            id: self.reservation_id.clone(),
            route_id: self.route_id.clone(),
            user_id: self.user_id.clone(),
            seats: self.seats,
            total_price: f64::from(self.seats) * snapshot.price,
            status: ReservationStatus::Confirmed,
        }
    }
}
