//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, FlightItem, Route, Timestamp};
use crate::planner::{CriterionKind, Ranking, RouteRequest, Weights};

/// Origin, destination and leg limit shared by every route request.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuery {
    pub origin: String,
    pub destination: String,

    /// Leg limit (0 = unbounded). Falls back to the server default.
    #[serde(default)]
    pub max_legs: Option<usize>,
}

impl RouteQuery {
    pub fn into_request(self) -> RouteRequest {
        RouteRequest {
            origin: self.origin,
            destination: self.destination,
            max_legs: self.max_legs,
        }
    }
}

/// Request to list every route.
#[derive(Debug, Deserialize)]
pub struct ListRoutesRequest {
    pub dataset: Dataset,
    #[serde(flatten)]
    pub query: RouteQuery,
}

/// Request to rank routes.
#[derive(Debug, Deserialize)]
pub struct RankRoutesRequest {
    pub dataset: Dataset,
    #[serde(flatten)]
    pub query: RouteQuery,

    /// Weights for the `optimal` criterion
    #[serde(default)]
    pub weights: Option<Weights>,

    /// Criterion names to evaluate. Defaults to all available.
    #[serde(default)]
    pub criteria: Option<Vec<String>>,
}

impl RankRoutesRequest {
    /// Resolve the requested criterion names.
    ///
    /// Returns the offending name if one is unknown, or is `optimal`
    /// without weights.
    pub fn criterion_kinds(&self) -> Result<Vec<CriterionKind>, String> {
        let Some(names) = &self.criteria else {
            return Ok(CriterionKind::defaults(self.weights));
        };
        names
            .iter()
            .map(|name| CriterionKind::from_name(name, self.weights).ok_or_else(|| name.clone()))
            .collect()
    }
}

/// Request to compare the legs of two datasets.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub before: Dataset,
    pub after: Dataset,
}

/// Request to compare the routes of two datasets.
#[derive(Debug, Deserialize)]
pub struct CompareRoutesRequest {
    pub before: Dataset,
    pub after: Dataset,
    #[serde(flatten)]
    pub query: RouteQuery,
}

/// A route in responses.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub key: String,
    pub origin: String,
    pub destination: String,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub legs: usize,
    pub elapsed_mins: i64,
    pub total_cost: f64,
    pub flights: Vec<FlightItem>,
}

impl RouteView {
    pub fn from_route(route: &Route) -> Self {
        Self {
            key: route.key(),
            origin: route.origin().to_string(),
            destination: route.destination().to_string(),
            departure: route.departure_time(),
            arrival: route.arrival_time(),
            legs: route.leg_count(),
            elapsed_mins: route.elapsed().num_minutes(),
            total_cost: route.total_cost(),
            flights: route.flights().to_vec(),
        }
    }
}

/// Response from listing routes.
#[derive(Debug, Serialize)]
pub struct RoutesResponse {
    pub routes: Vec<RouteView>,
}

impl RoutesResponse {
    pub fn from_routes(routes: &[Route]) -> Self {
        Self {
            routes: routes.iter().map(RouteView::from_route).collect(),
        }
    }
}

/// Response from ranking routes: the optimal routes per criterion name.
#[derive(Debug, Serialize)]
pub struct RankingResponse {
    pub rankings: BTreeMap<String, Vec<RouteView>>,
}

impl RankingResponse {
    pub fn from_ranking(ranking: &Ranking) -> Self {
        let rankings = ranking
            .iter()
            .map(|(name, routes)| {
                (
                    name.to_string(),
                    routes.iter().map(RouteView::from_route).collect(),
                )
            })
            .collect();
        Self { rankings }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
