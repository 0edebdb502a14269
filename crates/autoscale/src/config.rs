//! Application configuration loaded from TOML

use anyhow::{Context, Result};
use autoscale_core::{FilterSettings, LogConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "autoscale.toml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging
    pub log: LogConfig,
    /// Settings for sessions that do not carry their own
    pub settings: FilterSettings,
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if present.
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        Self::load_from_file(&path)
    }

    /// Parse a config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}
