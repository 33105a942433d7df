//! Default value functions for configuration.

use std::net::SocketAddr;

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 6973))
}

pub fn default_route() -> String {
    "/bunny".to_string()
}

// =============================================================================
// Logging Defaults
// =============================================================================

pub fn default_log_level() -> String {
    "info".to_string()
}

// =============================================================================
// Incognito Defaults
// =============================================================================

pub fn default_incognito_keywords() -> Vec<String> {
    ["!", "incognito", "incog", "nolog"]
        .into_iter()
        .map(String::from)
        .collect()
}
