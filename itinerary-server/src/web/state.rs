//! Application state for the web layer.

use std::sync::Arc;

use crate::diff::{DiffEngine, DiffError};
use crate::planner::PlannerConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Planner configuration
    pub config: Arc<PlannerConfig>,

    /// Comparison worker pool, sized from the configuration
    pub diff: DiffEngine,
}

impl AppState {
    /// Create a new app state.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the configuration asks for zero diff workers.
    pub fn new(config: PlannerConfig) -> Result<Self, DiffError> {
        let diff = DiffEngine::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            diff,
        })
    }
}
