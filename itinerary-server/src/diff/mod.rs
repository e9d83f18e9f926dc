//! Dataset comparison.
//!
//! Compares two snapshots of the same search, either leg by leg or route by
//! route, and reports what was added, removed and modified between them.

mod changelog;
mod collection;
mod engine;

use std::sync::Arc;

use crate::domain::{Dataset, FlightItem, Route};
use crate::planner::{PlannerConfig, PlannerError, RouteRequest, list_routes};

pub use changelog::{Change, ChangeKind, Changelog, changelog};
pub use collection::{Diffable, FlightsList, KeyedCollection, RoutesList};
pub use engine::{DiffEngine, DiffFailure, DiffResult, Modification};

/// Error from comparing datasets.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// An item could not be rendered for comparison
    #[error("failed to compute changelog: {0}")]
    Changelog(#[from] serde_json::Error),

    /// A worker task panicked or was cancelled
    #[error("diff worker failed: {0}")]
    Worker(String),

    /// The engine was configured without workers
    #[error("diff engine needs at least one worker")]
    NoWorkers,

    /// Listing the routes to compare failed
    #[error(transparent)]
    Planner(#[from] PlannerError),
}

/// Compare every leg of dataset `a` against dataset `b`.
pub async fn compare_flights(
    a: &Dataset,
    b: &Dataset,
    engine: &DiffEngine,
) -> Result<DiffResult<FlightItem>, DiffError> {
    let a = FlightsList::from_dataset(a);
    let b = FlightsList::from_dataset(b);
    engine.diff(&a, &b).await
}

/// Compare the routes `request` finds in dataset `a` against those it
/// finds in dataset `b`.
///
/// Route listing runs on the blocking thread pool.
pub async fn compare_routes(
    a: Arc<Dataset>,
    b: Arc<Dataset>,
    request: RouteRequest,
    config: Arc<PlannerConfig>,
    engine: &DiffEngine,
) -> Result<DiffResult<Route>, DiffError> {
    let (a, b) = tokio::task::spawn_blocking(move || {
        let a = list_routes(&a, &request, &config)?;
        let b = list_routes(&b, &request, &config)?;
        Ok::<_, PlannerError>((a, b))
    })
    .await
    .map_err(|e| DiffError::Worker(e.to_string()))??;

    let a: RoutesList = a.into_iter().collect();
    let b: RoutesList = b.into_iter().collect();
    engine.diff(&a, &b).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{flight, priced};
    use crate::domain::{Flight, PricedItinerary};

    fn group(legs: Vec<Flight>, total: f64) -> PricedItinerary {
        PricedItinerary {
            onward: legs,
            return_legs: Vec::new(),
            pricing: Some(priced(total)),
        }
    }

    fn before() -> Dataset {
        Dataset {
            itineraries: vec![
                group(vec![flight("1", "SEA", "JFK", "0800", "1300")], 300.0),
                group(
                    vec![
                        flight("2", "SEA", "ORD", "0700", "1000"),
                        flight("3", "ORD", "JFK", "1100", "1500"),
                    ],
                    100.0,
                ),
            ],
        }
    }

    fn after() -> Dataset {
        Dataset {
            itineraries: vec![
                group(
                    vec![
                        flight("2", "SEA", "ORD", "0700", "1000"),
                        flight("3", "ORD", "JFK", "1100", "1500"),
                    ],
                    120.0,
                ),
                group(vec![flight("5", "SEA", "JFK", "1200", "1700")], 280.0),
            ],
        }
    }

    #[tokio::test]
    async fn compares_legs() {
        let engine = DiffEngine::new(3).unwrap();
        let result = compare_flights(&before(), &after(), &engine).await.unwrap();

        assert_eq!(result.removals.len(), 1);
        assert_eq!(result.removals[0].flight.flight_number, "1");
        assert_eq!(result.additions.len(), 1);
        assert_eq!(result.additions[0].flight.flight_number, "5");
        // Both legs of the repriced group
        assert_eq!(result.modifications.len(), 2);
    }

    #[tokio::test]
    async fn compares_routes() {
        let engine = DiffEngine::new(2).unwrap();
        let result = compare_routes(
            Arc::new(before()),
            Arc::new(after()),
            RouteRequest::new("SEA", "JFK"),
            Arc::new(PlannerConfig::default()),
            &engine,
        )
        .await
        .unwrap();

        assert_eq!(result.removals.len(), 1);
        assert_eq!(result.removals[0].key(), ":AA:1:05-01-2024:Q1");
        assert_eq!(result.additions.len(), 1);
        assert_eq!(result.additions[0].key(), ":AA:5:05-01-2024:Q1");
        assert_eq!(result.modifications.len(), 1);
        assert_eq!(result.modifications[0].origin.leg_count(), 2);
    }

    #[tokio::test]
    async fn invalid_route_request() {
        let engine = DiffEngine::new(1).unwrap();
        let err = compare_routes(
            Arc::new(before()),
            Arc::new(after()),
            RouteRequest::new("", "JFK"),
            Arc::new(PlannerConfig::default()),
            &engine,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DiffError::Planner(PlannerError::InvalidRequest(_))));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            DiffError::NoWorkers.to_string(),
            "diff engine needs at least one worker"
        );
        assert_eq!(
            DiffError::Worker("boom".into()).to_string(),
            "diff worker failed: boom"
        );
    }
}
