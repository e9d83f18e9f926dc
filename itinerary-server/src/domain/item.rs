//! Itinerary records and the capabilities the search engine relies on.
//!
//! A `FlightItem` is one leg paired with the price breakdown of the group it
//! was sold in. It uses `Arc` for both so edges and routes clone cheaply
//! during BFS and so every leg of a group shares one `Pricing`.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::{Flight, Pricing, Timestamp, total_amount_of};

/// A payload with a departure and an arrival time.
///
/// This is what the graph needs to decide whether two edges chain.
pub trait Scheduled {
    fn departure(&self) -> Timestamp;

    fn arrival(&self) -> Timestamp;

    /// Returns true if `self` can be taken after `previous` with at least
    /// `transfer_window` between landing and departing.
    fn is_reachable_from(&self, previous: &Self, transfer_window: Duration) -> bool {
        match previous.arrival().checked_add(transfer_window) {
            Some(ready) => ready <= self.departure(),
            None => false,
        }
    }
}

/// A payload with an optional price.
pub trait Priced {
    /// Returns the total amount, or `None` if the payload is unpriced.
    fn total_amount(&self) -> Option<f64>;
}

/// A flight leg with its group's pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightItem {
    pub flight: Arc<Flight>,
    pub pricing: Option<Arc<Pricing>>,
}

impl FlightItem {
    /// Creates a new item.
    pub fn new(flight: Arc<Flight>, pricing: Option<Arc<Pricing>>) -> Self {
        Self { flight, pricing }
    }

    /// Identity key of the underlying flight.
    pub fn key(&self) -> String {
        self.flight.key()
    }

    /// Returns the departure location label.
    pub fn source(&self) -> &str {
        &self.flight.source
    }

    /// Returns the arrival location label.
    pub fn destination(&self) -> &str {
        &self.flight.destination
    }
}

impl Scheduled for FlightItem {
    fn departure(&self) -> Timestamp {
        self.flight.departure
    }

    fn arrival(&self) -> Timestamp {
        self.flight.arrival
    }
}

impl Priced for FlightItem {
    fn total_amount(&self) -> Option<f64> {
        total_amount_of(self.pricing.as_deref())
    }
}
