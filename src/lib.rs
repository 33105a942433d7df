//! usagi - smart-bookmark redirect service.
//!
//! Type `g hello world` into the browser's address bar, get sent to a Google
//! search. The resolution engine lives in `usagi-core`; this crate supplies the
//! built-in command catalog, configuration, the HTTP surface and metrics.

pub mod commands;
pub mod config;
pub mod http;
pub mod incognito;
pub mod metrics;
pub mod telemetry;
