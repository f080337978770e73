//! Configuration module
//!
//! Loaded from a TOML file (default `~/.config/bus-network/config.toml`).
//! Every section is optional; missing values fall back to defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSection {
    /// Full connection URL; wins over `path`
    pub url: Option<String>,
    /// SQLite file path
    pub path: Option<String>,
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        match (&self.url, &self.path) {
            (Some(url), _) => url.clone(),
            (None, Some(path)) => DatabaseConfig::sqlite(path).url,
            (None, None) => DatabaseConfig::default().url,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,
    /// "pretty" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "pretty".to_string()
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.logging.format.to_lowercase().as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "logging.format",
                    reason: format!("expected \"pretty\" or \"json\", got {:?}", other),
                })
            }
        }
        if let Some(url) = &self.database.url {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "database.url",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.connection_url(),
        }
    }
}

/// `<config dir>/bus-network/config.toml`, or `./config.toml` when the
/// platform has no config directory.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("bus-network").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
