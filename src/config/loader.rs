//! Configuration Loader
//!
//! Loads and validates configuration from TOML files:
//!
//! ```toml
//! [indicator]
//! long_term_ema_period = 100
//! big_threshold = 1.75
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every key is optional and falls back to its default.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::strategy::params::{self, IndicatorConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub indicator: IndicatorConfig,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(#[from] params::ConfigError),
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, LoadError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, LoadError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), LoadError> {
        self.indicator.validate()?;

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(LoadError::InvalidLogLevel(self.logging.level.clone()));
        }
        Ok(())
    }
}
