//! Configuration Module
//!
//! Handles loading cache limits and monitor settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Environment variable holding the total cost limit
pub const COST_LIMIT_VAR: &str = "CACHE_COST_LIMIT";
/// Environment variable holding the entry count limit
pub const COUNT_LIMIT_VAR: &str = "CACHE_COUNT_LIMIT";
/// Environment variable holding the pressure probe interval in milliseconds
pub const PRESSURE_INTERVAL_VAR: &str = "PRESSURE_CHECK_INTERVAL_MS";

/// Cache configuration parameters.
///
/// Limits default to `i64::MAX`, which means unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Maximum total cost of all entries
    pub cost_limit: i64,
    /// Maximum number of entries
    pub count_limit: i64,
    /// How often the pressure monitor polls its probe, in milliseconds
    pub pressure_check_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unset or unparsable variables fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_COST_LIMIT` - Total cost limit (default: unbounded)
    /// - `CACHE_COUNT_LIMIT` - Entry count limit (default: unbounded)
    /// - `PRESSURE_CHECK_INTERVAL_MS` - Probe interval (default: 1000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cost_limit: lenient(COST_LIMIT_VAR).unwrap_or(defaults.cost_limit),
            count_limit: lenient(COUNT_LIMIT_VAR).unwrap_or(defaults.count_limit),
            pressure_check_interval_ms: lenient(PRESSURE_INTERVAL_VAR)
                .unwrap_or(defaults.pressure_check_interval_ms),
        }
    }

    /// Like [`Config::from_env`], but a set variable that fails to parse is
    /// reported instead of silently replaced by its default.
    pub fn try_from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            cost_limit: strict(COST_LIMIT_VAR)?.unwrap_or(defaults.cost_limit),
            count_limit: strict(COUNT_LIMIT_VAR)?.unwrap_or(defaults.count_limit),
            pressure_check_interval_ms: strict(PRESSURE_INTERVAL_VAR)?
                .unwrap_or(defaults.pressure_check_interval_ms),
        })
    }

    /// Probe interval as a `Duration`.
    pub fn pressure_check_interval(&self) -> Duration {
        Duration::from_millis(self.pressure_check_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cost_limit: i64::MAX,
            count_limit: i64::MAX,
            pressure_check_interval_ms: 1000,
        }
    }
}

fn lenient<T: FromStr>(var: &str) -> Option<T> {
    env::var(var).ok().and_then(|v| v.trim().parse().ok())
}

fn strict<T: FromStr>(var: &str) -> Result<Option<T>> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CacheError::InvalidConfig {
                var: var.to_string(),
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}
