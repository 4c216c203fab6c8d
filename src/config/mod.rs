//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Insight engine tuning exposed to the CLI and API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsConfig {
    /// Related matches returned when no limit is requested
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,

    /// Recent meetings kept in head-to-head records
    #[serde(default = "default_recent_meetings")]
    pub recent_meetings: usize,

    /// Default page size for match listings
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_related_limit() -> usize {
    crate::insights::DEFAULT_RELATED_LIMIT
}

fn default_recent_meetings() -> usize {
    crate::insights::RECENT_MEETINGS
}

fn default_page_size() -> usize {
    50
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            related_limit: default_related_limit(),
            recent_meetings: default_recent_meetings(),
            page_size: default_page_size(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub insights: InsightsConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            insights: InsightsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists; `None` when there is no file.
    pub fn load_optional(path: &Path) -> Result<Option<Self>, ConfigError> {
        if path.exists() {
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.insights.related_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Related match limit must be greater than 0".to_string(),
            ));
        }

        if self.insights.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "Page size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
