// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI settings file
//!
//! ```toml
//! [bus]
//! dispatch_mode = "strict_critical"
//! handler_timeout = "2s"
//!
//! [log]
//! level = "debug"
//! file = "/tmp/agora.log"
//! ```
//!
//! Lookup order: `--config`, then `AGORA_CONFIG`, then
//! `<config dir>/agora/config.toml` if it exists, then built-in defaults.

use agora_core::{BusConfig, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "AGORA_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub bus: BusConfig,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    /// Write logs here instead of stderr
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(s)?;
        settings.bus.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Pick the settings file to load, if any
///
/// An explicitly named file (flag or environment) must exist; the per-user
/// default is only used when present.
pub fn locate(flag: Option<&Path>, env: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = flag {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path);
    }
    dirs::config_dir()
        .map(|dir| dir.join("agora").join("config.toml"))
        .filter(|path| path.is_file())
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
