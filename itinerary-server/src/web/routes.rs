//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::task::JoinError;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::diff::{DiffError, DiffResult, compare_flights, compare_routes};
use crate::domain::{FlightItem, Route};
use crate::planner::{PlannerError, list_routes, rank_routes};

use super::dto::*;
use super::state::AppState;

/// Datasets are sent inline, so allow bodies well past axum's default.
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/routes", post(plan_routes))
        .route("/routes/rank", post(rank))
        .route("/compare", post(compare))
        .route("/compare/routes", post(compare_route_lists))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// List every route between two locations.
async fn plan_routes(
    State(state): State<AppState>,
    Json(req): Json<ListRoutesRequest>,
) -> Result<Json<RoutesResponse>, AppError> {
    let ListRoutesRequest { dataset, query } = req;
    let request = query.into_request();
    let config = Arc::clone(&state.config);

    let routes =
        tokio::task::spawn_blocking(move || list_routes(&dataset, &request, &config)).await??;

    Ok(Json(RoutesResponse::from_routes(&routes)))
}

/// Rank routes under each requested criterion.
async fn rank(
    State(state): State<AppState>,
    Json(req): Json<RankRoutesRequest>,
) -> Result<Json<RankingResponse>, AppError> {
    let kinds = req.criterion_kinds().map_err(|name| AppError::BadRequest {
        message: format!("unknown criterion {name:?} (\"optimal\" requires weights)"),
    })?;
    let RankRoutesRequest { dataset, query, .. } = req;
    let request = query.into_request();
    let config = Arc::clone(&state.config);

    let response = tokio::task::spawn_blocking(move || {
        rank_routes(&dataset, &request, &kinds, &config)
            .map(|ranking| RankingResponse::from_ranking(&ranking))
    })
    .await??;

    Ok(Json(response))
}

/// Compare the legs of two datasets.
async fn compare(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<DiffResult<FlightItem>>, AppError> {
    let result = compare_flights(&req.before, &req.after, &state.diff).await?;
    Ok(Json(result))
}

/// Compare the routes two datasets offer between the same locations.
async fn compare_route_lists(
    State(state): State<AppState>,
    Json(req): Json<CompareRoutesRequest>,
) -> Result<Json<DiffResult<Route>>, AppError> {
    let CompareRoutesRequest {
        before,
        after,
        query,
    } = req;

    let result = compare_routes(
        Arc::new(before),
        Arc::new(after),
        query.into_request(),
        Arc::clone(&state.config),
        &state.diff,
    )
    .await?;

    Ok(Json(result))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Internal { message: String },
}

impl From<PlannerError> for AppError {
    fn from(e: PlannerError) -> Self {
        match e {
            PlannerError::InvalidRequest(_) => AppError::BadRequest {
                message: e.to_string(),
            },
            PlannerError::Domain(_) => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<DiffError> for AppError {
    fn from(e: DiffError) -> Self {
        match e {
            DiffError::Planner(inner) => inner.into(),
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl From<JoinError> for AppError {
    fn from(e: JoinError) -> Self {
        AppError::Internal {
            message: format!("background task failed: {e}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            warn!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
