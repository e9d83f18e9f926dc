//! Route planner.
//!
//! Answers two questions about a dataset: "which routes take me from A to
//! B?" and "which of those are best by cost, by time, or by a blend of
//! both?". All the graph work is synchronous and CPU-bound; callers on an
//! async runtime should move it off the reactor.

mod config;
mod criteria;
mod search;

pub use config::{
    ConfigError, ENV_DIFF_WORKERS, ENV_MAX_LEGS, ENV_TRANSFER_WINDOW, MAX_TRANSFER_WINDOW_MINS,
    PlannerConfig,
};
pub use criteria::{Accumulator, Criterion, CriterionKind, Score, Weights};
pub use search::{PlannerError, Ranking, RouteRequest, list_routes, rank_routes};
