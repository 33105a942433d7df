//! Core configuration types.

use super::defaults::{default_incognito_keywords, default_listen, default_log_level, default_route};
use serde::Deserialize;
use std::io::ErrorKind;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Service configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub modules: ModulesConfig,
    #[serde(default)]
    pub incognito: IncognitoConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address of the redirect endpoint (default: 0.0.0.0:6973).
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,
    /// Port for the Prometheus `/metrics` listener. Absent or 0 disables it.
    #[serde(default)]
    pub metrics_port: Option<u16>,
    /// Path of the redirect endpoint (default: /bunny).
    #[serde(default = "default_route")]
    pub route: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            metrics_port: None,
            route: default_route(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Built-in module selection and language defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModulesConfig {
    /// Built-in module names not to register.
    #[serde(default)]
    pub disabled: Vec<String>,
    /// Locale tags appended after the request's own preferences.
    #[serde(default)]
    pub default_languages: Vec<String>,
}

/// Incognito prefix keywords.
#[derive(Debug, Clone, Deserialize)]
pub struct IncognitoConfig {
    #[serde(default = "default_incognito_keywords")]
    pub keywords: Vec<String>,
}

impl Default for IncognitoConfig {
    fn default() -> Self {
        Self {
            keywords: default_incognito_keywords(),
        }
    }
}
