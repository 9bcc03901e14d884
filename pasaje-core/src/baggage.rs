use serde::{Deserialize, Serialize};

/// One line of baggage attached to a baggage reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baggage {
    pub quantity: u32,
    #[serde(rename = "type")]
    pub baggage_type: String,
}

/// Accumulating baggage record for a booking.
///
/// `weight` counts items rather than mass. Missing fields deserialize to
/// their zero values, so callers may post a partially filled record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaggageReservation {
    pub id: String,
    pub reservation_id: String,
    pub weight: f64,
    pub price: f64,
    #[serde(rename = "type")]
    pub baggage_type: String,
    pub baggage: Vec<Baggage>,
}

impl BaggageReservation {
    /// Append an item and fold its price and count into the running totals.
    pub fn append(&mut self, item: Baggage, added_price: f64) {
        self.price += added_price;
        self.weight += f64::from(item.quantity);
        self.baggage.push(item);
    }
}

/// Reference price list entry, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaggageType {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub price: f64,
}
