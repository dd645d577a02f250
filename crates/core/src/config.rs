// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime configuration
//!
//! Every section and key is optional; missing values fall back to the
//! built-in defaults.
//!
//! ```toml
//! [task]
//! max_attempts = 3
//! timeout = "30s"
//! base_delay = "1s"
//! exponential = true
//!
//! [plan]
//! max_attempts = 3
//! base_delay = "1s"
//! step_timeout = "2m"   # optional
//!
//! [fallback]
//! min_results = 3
//! max_fallbacks = 3
//!
//! [events]
//! handler_timeout = "5s"
//! ```

use crate::retry::{Backoff, RetryPolicy};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    pub task: TaskConfig,
    pub plan: PlanConfig,
    pub fallback: FallbackConfig,
    pub events: EventsConfig,
}

/// Ad-hoc task runner defaults
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    pub exponential: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(30),
            base_delay: Duration::from_secs(1),
            exponential: true,
        }
    }
}

impl TaskConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        let backoff = if self.exponential {
            Backoff::Exponential
        } else {
            Backoff::Constant
        };
        RetryPolicy::new(self.max_attempts, self.base_delay, backoff)
    }
}

/// Plan step retry settings (backoff is always linear)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    pub max_attempts: u32,
    #[serde(with = "humantime_serde")]
    pub base_delay: Duration,
    /// Per-attempt tool limit; unbounded when unset
    #[serde(with = "humantime_serde")]
    pub step_timeout: Option<Duration>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            step_timeout: None,
        }
    }
}

impl PlanConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, self.base_delay, Backoff::Linear)
    }
}

/// Fallback search chain limits
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FallbackConfig {
    /// Leads a source must return to count as a success
    pub min_results: usize,
    /// Fallback sources tried after the primary
    pub max_fallbacks: usize,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            min_results: 3,
            max_fallbacks: 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EventsConfig {
    #[serde(with = "humantime_serde")]
    pub handler_timeout: Option<Duration>,
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.task.max_attempts == 0 {
            return Err(ConfigError::Invalid("task.max_attempts must be at least 1".into()));
        }
        if self.plan.max_attempts == 0 {
            return Err(ConfigError::Invalid("plan.max_attempts must be at least 1".into()));
        }
        if self.task.timeout.is_zero() {
            return Err(ConfigError::Invalid("task.timeout must be positive".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
