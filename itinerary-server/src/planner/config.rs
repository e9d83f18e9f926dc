//! Configuration for route search and comparison.

use std::str::FromStr;

use chrono::Duration;

/// Environment variable overriding the transfer window (minutes).
pub const ENV_TRANSFER_WINDOW: &str = "ITINERARY_TRANSFER_WINDOW_MINS";

/// Environment variable overriding the default leg limit.
pub const ENV_MAX_LEGS: &str = "ITINERARY_MAX_LEGS";

/// Environment variable overriding the number of diff workers.
pub const ENV_DIFF_WORKERS: &str = "ITINERARY_DIFF_WORKERS";

/// Largest transfer window `chrono::Duration` can hold, in minutes.
pub const MAX_TRANSFER_WINDOW_MINS: i64 = i64::MAX / 60_000;

/// Error from reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set but isn't a non-negative integer
    #[error("{name} must be a non-negative integer, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    /// A variable is a number but outside the accepted range
    #[error("{name} must be at most {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: u64,
        max: u64,
    },

    /// The diff engine needs at least one worker
    #[error("ITINERARY_DIFF_WORKERS must be at least 1")]
    NoWorkers,
}

/// Configuration parameters for route search and comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerConfig {
    /// Minimum time between one leg landing and the next departing (minutes).
    pub transfer_window_mins: i64,

    /// Leg limit used when a request doesn't set one. Zero means unbounded.
    pub default_max_legs: usize,

    /// Number of concurrent comparison workers in the diff engine.
    pub diff_workers: usize,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(transfer_window_mins: i64, default_max_legs: usize, diff_workers: usize) -> Self {
        Self {
            transfer_window_mins,
            default_max_legs,
            diff_workers,
        }
    }

    /// Defaults, overridden by any `ITINERARY_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults, overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(mins) = parse_var::<u64, _>(&lookup, ENV_TRANSFER_WINDOW)? {
            config.transfer_window_mins = i64::try_from(mins)
                .ok()
                .filter(|m| *m <= MAX_TRANSFER_WINDOW_MINS)
                .ok_or(ConfigError::OutOfRange {
                    name: ENV_TRANSFER_WINDOW,
                    value: mins,
                    max: MAX_TRANSFER_WINDOW_MINS as u64,
                })?;
        }
        if let Some(legs) = parse_var::<usize, _>(&lookup, ENV_MAX_LEGS)? {
            config.default_max_legs = legs;
        }
        if let Some(workers) = parse_var::<usize, _>(&lookup, ENV_DIFF_WORKERS)? {
            if workers == 0 {
                return Err(ConfigError::NoWorkers);
            }
            config.diff_workers = workers;
        }

        Ok(config)
    }

    /// Returns the transfer window as a Duration.
    ///
    /// Negative windows count as zero; windows too large to represent
    /// saturate, so no connection ever satisfies them.
    pub fn transfer_window(&self) -> Duration {
        Duration::try_minutes(self.transfer_window_mins.max(0)).unwrap_or(Duration::MAX)
    }
}

fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::NotANumber { name, value })
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            transfer_window_mins: 60,
            default_max_legs: 0,
            diff_workers: 10,
        }
    }
}
