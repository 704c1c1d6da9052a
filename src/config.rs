//! Configuration for stylestore
//!
//! Centralized configuration with sensible defaults.

use std::env;
use std::path::PathBuf;

use crate::error::{Result, StyleError};

/// Environment variable holding the data directory
pub const DATA_ROOT_ENV: &str = "DATA_ROOT";

/// Environment variable holding the save interval in seconds
pub const SAVE_SECONDS_ENV: &str = "SAVE_SECONDS";

/// Main configuration for a stylestore instance
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the backing file. Must already exist.
    ///   {data_dir}/
    ///     └── styles.json
    pub data_dir: PathBuf,

    /// Seconds between background saves (0 = only save on flush)
    pub save_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/app/data"),
            save_seconds: 30,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build config from `DATA_ROOT` and `SAVE_SECONDS`, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(dir) = env::var(DATA_ROOT_ENV) {
            if !dir.is_empty() {
                config.data_dir = PathBuf::from(dir);
            }
        }

        if let Ok(secs) = env::var(SAVE_SECONDS_ENV) {
            if !secs.is_empty() {
                config.save_seconds = secs.trim().parse().map_err(|_| {
                    StyleError::Config(format!(
                        "{} must be a whole number of seconds, got \"{}\"",
                        SAVE_SECONDS_ENV, secs
                    ))
                })?;
            }
        }

        Ok(config)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (where styles.json lives)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the background save interval in seconds
    pub fn save_seconds(mut self, secs: u64) -> Self {
        self.config.save_seconds = secs;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
