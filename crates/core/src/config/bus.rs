// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bus configuration
//!
//! ```toml
//! dispatch_mode = "strict_critical"
//! handler_timeout = "250ms"
//! max_cascade = 512
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on events processed by one dispatch cycle
pub const DEFAULT_MAX_CASCADE: usize = 1024;

/// How the handlers of one event are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// All matching handlers run as one concurrent batch
    #[default]
    Concurrent,
    /// Critical events run their handlers one at a time in registration
    /// order; other priorities run concurrently
    StrictCritical,
}

/// Bus configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
    pub dispatch_mode: DispatchMode,
    /// Per-handler deadline; a handler exceeding it is recorded as timed out
    #[serde(with = "humantime_serde")]
    pub handler_timeout: Option<Duration>,
    /// Maximum events (root plus nested) processed by one publish
    pub max_cascade: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            dispatch_mode: DispatchMode::default(),
            handler_timeout: None,
            max_cascade: DEFAULT_MAX_CASCADE,
        }
    }
}

impl BusConfig {
    pub fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    pub fn with_handler_timeout(mut self, timeout: Duration) -> Self {
        self.handler_timeout = Some(timeout);
        self
    }

    pub fn with_max_cascade(mut self, max: usize) -> Self {
        self.max_cascade = max;
        self
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cascade == 0 {
            return Err(ConfigError::Invalid(
                "max_cascade must be at least 1".to_string(),
            ));
        }
        if self.handler_timeout == Some(Duration::ZERO) {
            return Err(ConfigError::Invalid(
                "handler_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
