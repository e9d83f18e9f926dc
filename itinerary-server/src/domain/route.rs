//! Route type.
//!
//! A `Route` is the materialized form of a graph path: the legs taken, in
//! order, from origin to destination.

use chrono::Duration;
use serde::Serialize;

use super::{DomainError, FlightItem, Priced, Scheduled, Timestamp};

/// An ordered chain of legs.
///
/// # Invariants
///
/// - At least one leg
/// - Consecutive legs connect (destination of one = source of next)
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    flights: Vec<FlightItem>,
}

impl Route {
    /// Constructs a route from legs.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the list is empty or two consecutive legs don't
    /// meet at the same location.
    pub fn new(flights: Vec<FlightItem>) -> Result<Self, DomainError> {
        if flights.is_empty() {
            return Err(DomainError::EmptyRoute);
        }

        for window in flights.windows(2) {
            let (prev, next) = (&window[0], &window[1]);
            if prev.destination() != next.source() {
                return Err(DomainError::LegsNotConnected(
                    prev.destination().to_string(),
                    next.source().to_string(),
                ));
            }
        }

        Ok(Self { flights })
    }

    /// Composite key: every leg's key, each prefixed with `:`, in order.
    pub fn key(&self) -> String {
        self.flights
            .iter()
            .map(|f| format!(":{}", f.key()))
            .collect()
    }

    /// Returns the legs in order.
    pub fn flights(&self) -> &[FlightItem] {
        &self.flights
    }

    pub fn leg_count(&self) -> usize {
        self.flights.len()
    }

    pub fn origin(&self) -> &str {
        self.flights[0].source()
    }

    pub fn destination(&self) -> &str {
        self.flights[self.flights.len() - 1].destination()
    }

    pub fn departure_time(&self) -> Timestamp {
        self.flights[0].departure()
    }

    pub fn arrival_time(&self) -> Timestamp {
        self.flights[self.flights.len() - 1].arrival()
    }

    /// Time from first departure to last arrival.
    pub fn elapsed(&self) -> Duration {
        self.arrival_time()
            .signed_duration_since(self.departure_time())
    }

    /// Sum of every priced leg's total. Unpriced legs add nothing.
    pub fn total_cost(&self) -> f64 {
        self.flights.iter().filter_map(|f| f.total_amount()).sum()
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Route {}
