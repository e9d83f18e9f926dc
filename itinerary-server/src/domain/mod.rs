//! Domain types for the itinerary service.
//!
//! This module contains the validated itinerary data the graph, planner and
//! diff engine operate on: flight legs, their pricing, the records pairing
//! the two, routes, and whole datasets.

mod dataset;
mod error;
mod flight;
mod item;
mod pricing;
mod route;
mod time;

pub use dataset::{Dataset, PricedItinerary};
pub use error::DomainError;
pub use flight::{Carrier, Flight};
pub use item::{FlightItem, Priced, Scheduled};
pub use pricing::{Pricing, SINGLE_ADULT, ServiceCharge, TOTAL_AMOUNT, total_amount_of};
pub use route::Route;
pub use time::{TimeError, Timestamp};

#[cfg(test)]
pub(crate) mod fixtures {
    pub(crate) use super::flight::fixtures::flight;
    pub(crate) use super::item::fixtures::{item, unpriced};
    pub(crate) use super::pricing::fixtures::priced;
}
