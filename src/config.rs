//! Runtime configuration from the environment.

use std::str::FromStr;

use crate::deco::ValidationLimits;
use crate::error::{AppError, Result};

const DEFAULT_LOG_FILTER: &str = "dive_planner=info";

/// Settings read from `DIVE_PLANNER_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// tracing filter used when `RUST_LOG` is unset
    pub log_filter: String,
    pub limits: ValidationLimits,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            limits: ValidationLimits::default(),
            pretty: true,
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let log_filter = lookup("DIVE_PLANNER_LOG").unwrap_or(defaults.log_filter);

        let max_depth = parse_var(&lookup, "DIVE_PLANNER_MAX_DEPTH")?
            .unwrap_or(defaults.limits.max_depth);
        if !(max_depth > 0.0 && max_depth.is_finite()) {
            return Err(AppError::Config(format!(
                "DIVE_PLANNER_MAX_DEPTH must be a positive number of meters (got {})",
                max_depth
            )));
        }

        let pretty = parse_var(&lookup, "DIVE_PLANNER_PRETTY")?.unwrap_or(defaults.pretty);

        Ok(Self {
            log_filter,
            limits: ValidationLimits { max_depth },
            pretty,
        })
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| AppError::Config(format!("{}: {}", key, e))),
    }
}
