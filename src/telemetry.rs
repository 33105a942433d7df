//! Logging setup and resolution timing.

use crate::config::{LogFormat, LoggingConfig};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

/// Guard for timing one resolution.
///
/// Records latency when dropped.
pub struct ResolveTimer {
    start: Instant,
}

impl ResolveTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for ResolveTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ResolveTimer {
    fn drop(&mut self) {
        crate::metrics::record_resolve_latency(self.start.elapsed().as_secs_f64());
    }
}
