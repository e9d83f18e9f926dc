//! Flight itinerary service.
//!
//! Builds a directed graph of flight legs from fare-search datasets and
//! answers: "which routes get me from A to B, which of them are cheapest,
//! fastest or best overall, and what changed between two snapshots?"

pub mod diff;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod web;
