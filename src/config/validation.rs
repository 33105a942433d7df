//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use thiserror::Error;
use usagi_core::Locale;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.route must start with '/', got '{0}'")]
    InvalidRoute(String),
    #[error("server.route '{0}' collides with a built-in endpoint")]
    ReservedRoute(String),
    #[error("server.metrics_port {0} is the same as the listen port")]
    MetricsPortConflict(u16),
    #[error("modules.disabled names an unknown module: {0}")]
    UnknownModule(String),
    #[error("modules.default_languages has an invalid locale tag: '{0}'")]
    InvalidLanguage(String),
    #[error("incognito.keywords must not contain empty or whitespace-bearing entries: '{0}'")]
    InvalidIncognitoKeyword(String),
}

const RESERVED_ROUTES: &[&str] = &["/healthz", "/help"];

/// Validate a configuration, returning all errors found.
///
/// `modules` is the list of built-in module names that `modules.disabled`
/// may refer to.
pub fn validate(config: &Config, modules: &[String]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let route = &config.server.route;
    if !route.starts_with('/') {
        errors.push(ValidationError::InvalidRoute(route.clone()));
    } else if route == "/" || RESERVED_ROUTES.contains(&route.as_str()) {
        errors.push(ValidationError::ReservedRoute(route.clone()));
    }

    if let Some(port) = config.server.metrics_port
        && port != 0
        && port == config.server.listen.port()
    {
        errors.push(ValidationError::MetricsPortConflict(port));
    }

    for name in &config.modules.disabled {
        if !modules.iter().any(|known| known.eq_ignore_ascii_case(name)) {
            errors.push(ValidationError::UnknownModule(name.clone()));
        }
    }

    for tag in &config.modules.default_languages {
        if Locale::parse(tag).is_err() {
            errors.push(ValidationError::InvalidLanguage(tag.clone()));
        }
    }

    for keyword in &config.incognito.keywords {
        if keyword.is_empty() || keyword.chars().any(char::is_whitespace) {
            errors.push(ValidationError::InvalidIncognitoKeyword(keyword.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
