//! Web layer for the itinerary service.
//!
//! A JSON API over the planner and the diff engine. Datasets travel in the
//! request bodies; nothing is stored between requests.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
