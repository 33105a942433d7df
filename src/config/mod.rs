//! Configuration loading and management.
//!
//! - [`types`]: config struct definitions and file loading
//! - [`validation`]: startup checks collecting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{
    Config, ConfigError, IncognitoConfig, LogFormat, LoggingConfig, ModulesConfig, ServerConfig,
};
pub use validation::{ValidationError, validate};
