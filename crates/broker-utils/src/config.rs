//! Engine configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the historic price file location
pub const DATA_PATH_ENV: &str = "STOCK_BROKER_DATA";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for `EngineConfig`
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field holds a value the engine cannot run with
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine configuration
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Historic price table, rewritten on every run
    pub data_path: PathBuf,
    /// History depth at which the score is trusted (steady-state mode)
    pub cold_start_depth: usize,
    /// In cold-start mode, holdings are liquidated when depth is a multiple of this
    pub liquidation_period: usize,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data.csv"),
            cold_start_depth: 15,
            liquidation_period: 10,
            log_filter: "warn".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply `STOCK_BROKER_DATA` if it is set
    pub fn with_env(mut self) -> Self {
        if let Ok(path) = std::env::var(DATA_PATH_ENV) {
            if !path.is_empty() {
                self.data_path = PathBuf::from(path);
            }
        }
        self
    }

    /// Override the historic price file location
    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cold_start_depth == 0 {
            return Err(ConfigError::Invalid(
                "cold_start_depth must be greater than 0".to_string(),
            ));
        }

        if self.liquidation_period == 0 {
            return Err(ConfigError::Invalid(
                "liquidation_period must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
