use std::net::SocketAddr;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use itinerary_server::planner::PlannerConfig;
use itinerary_server::web::{AppState, create_router};

/// Environment variable holding the listen address.
const ENV_ADDR: &str = "ITINERARY_ADDR";

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("itinerary_server=info,tower_http=info")),
        )
        .init();

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let addr_text = std::env::var(ENV_ADDR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr_text.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(addr = %addr_text, error = %e, "Invalid listen address");
            return ExitCode::FAILURE;
        }
    };

    info!(
        transfer_window_mins = config.transfer_window_mins,
        default_max_legs = config.default_max_legs,
        diff_workers = config.diff_workers,
        "Loaded configuration"
    );

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to build application state");
            return ExitCode::FAILURE;
        }
    };
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    info!("Itinerary service listening on http://{addr}");
    info!("  GET  /health          - Health check");
    info!("  POST /routes          - List routes");
    info!("  POST /routes/rank     - Rank routes by criterion");
    info!("  POST /compare         - Compare the legs of two datasets");
    info!("  POST /compare/routes  - Compare the routes of two datasets");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
