//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! tuned defaults.
//!
//! ```toml
//! [assist]
//! debt_paying_speed = 0.02
//!
//! [assist.field]
//! radius = 160.0
//! sigma = 51.9
//!
//! [assist.speed_curve]
//! a = 150.0
//! b = 350.0
//! k1 = 1.0
//! k2 = 3.0
//! k3 = 1.0
//! s = 500.0
//! reversed = true
//!
//! [logging]
//! level = "debug"
//! format = "compact"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod types;

pub use types::{LogFormat, LoggingConfig};

use crate::assist::AssistConfig;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Controller tunables
    #[serde(default)]
    pub assist: AssistConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    /// Create default configuration
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.assist
            .validate()
            .context("Invalid assist configuration")?;

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override logging with CLI arguments
    pub fn with_overrides(mut self, verbose: u8, format: Option<LogFormat>) -> Self {
        match verbose {
            0 => {}
            1 => self.logging.level = "debug".to_string(),
            _ => self.logging.level = "trace".to_string(),
        }
        if let Some(format) = format {
            self.logging.format = format;
        }
        self
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}
