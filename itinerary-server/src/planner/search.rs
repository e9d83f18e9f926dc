//! Route listing and ranking over a dataset.
//!
//! Both operations build the flight graph of the dataset, run one traversal
//! and materialize the resulting paths as [`Route`]s.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::domain::{Dataset, DomainError, FlightItem, Route};
use crate::graph::{ItineraryGraph, Path};

use super::config::PlannerConfig;
use super::criteria::{Criterion, CriterionKind};

/// Error from route planning.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Invalid route request
    #[error("invalid route request: {0}")]
    InvalidRequest(String),

    /// A path could not be turned into a route
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Request for routes between two locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,

    /// Leg limit. `None` uses the configured default; `Some(0)` is unbounded.
    pub max_legs: Option<usize>,
}

impl RouteRequest {
    /// Create a new request with the configured leg limit.
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            max_legs: None,
        }
    }

    /// Set an explicit leg limit.
    pub fn with_max_legs(mut self, max_legs: usize) -> Self {
        self.max_legs = Some(max_legs);
        self
    }

    /// Validate the request.
    ///
    /// Blank labels are rejected. `origin == destination` is valid and
    /// simply has no routes.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.origin.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "origin must not be blank".to_string(),
            ));
        }
        if self.destination.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(
                "destination must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Leg limit to search with.
    pub fn effective_max_legs(&self, config: &PlannerConfig) -> usize {
        self.max_legs.unwrap_or(config.default_max_legs)
    }
}

/// Optimal routes per criterion name.
pub type Ranking = BTreeMap<&'static str, Vec<Route>>;

/// Every route from the request's origin to its destination, in BFS order.
///
/// # Errors
///
/// Returns `Err` if the request is invalid.
pub fn list_routes(
    dataset: &Dataset,
    request: &RouteRequest,
    config: &PlannerConfig,
) -> Result<Vec<Route>, PlannerError> {
    request.validate()?;

    let graph = ItineraryGraph::from_dataset(dataset, config.transfer_window());
    let max_legs = request.effective_max_legs(config);
    let paths = graph.get_paths(&request.origin, &request.destination, max_legs);
    let routes = to_routes(&paths)?;

    info!(
        origin = %request.origin,
        destination = %request.destination,
        max_legs,
        routes = routes.len(),
        "Listed routes"
    );

    Ok(routes)
}

/// The optimal routes under each criterion in `kinds`.
///
/// Every criterion sees the same single traversal. Ties are kept: each
/// entry holds every route sharing the best score. A criterion with no
/// route at all maps to an empty list.
///
/// # Errors
///
/// Returns `Err` if the request is invalid.
pub fn rank_routes(
    dataset: &Dataset,
    request: &RouteRequest,
    kinds: &[CriterionKind],
    config: &PlannerConfig,
) -> Result<Ranking, PlannerError> {
    request.validate()?;

    let graph = ItineraryGraph::from_dataset(dataset, config.transfer_window());
    let max_legs = request.effective_max_legs(config);

    let mut criteria: Vec<Criterion<'_, FlightItem>> =
        kinds.iter().copied().map(Criterion::new).collect();
    let stats = graph.search_optimal_paths(
        &request.origin,
        &request.destination,
        max_legs,
        &mut criteria,
    );

    let mut ranking = Ranking::new();
    for criterion in criteria {
        let name = criterion.kind().name();
        debug!(
            criterion = name,
            best = ?criterion.best_so_far(),
            tied = criterion.paths().len(),
            "Criterion settled"
        );
        ranking.insert(name, to_routes(criterion.paths())?);
    }

    info!(
        origin = %request.origin,
        destination = %request.destination,
        criteria = kinds.len(),
        completed = stats.completed,
        "Ranked routes"
    );

    Ok(ranking)
}

fn to_routes(paths: &[Path<'_, FlightItem>]) -> Result<Vec<Route>, DomainError> {
    paths
        .iter()
        .map(|path| Route::new(path.values().cloned().collect()))
        .collect()
}
