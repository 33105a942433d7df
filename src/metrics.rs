//! Prometheus metrics for the redirect service.
//!
//! Exposes resolution counts by match mode, registry conflicts by kind and
//! resolution latency.

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

/// Global Prometheus registry.
static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Resolutions by how they ended (`trigger`, `slash`, `regex`, `fallback`, `last_resort`).
pub static RESOLUTIONS: OnceLock<IntCounterVec> = OnceLock::new();
/// Registration diagnostics by error code.
pub static REGISTRY_CONFLICTS: OnceLock<IntCounterVec> = OnceLock::new();
/// Time spent resolving one command.
pub static RESOLVE_LATENCY: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup before any metrics are recorded; later calls are no-ops.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                match $init {
                    Ok(m) => {
                        if let Err(e) = r.register(Box::new(m.clone())) {
                            tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                        }
                        let _ = $metric.set(m);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, concat!("Failed to create metric ", stringify!($metric)));
                    }
                }
            }
        };
    }

    register!(RESOLUTIONS, IntCounterVec::new(Opts::new("usagi_resolutions_total", "Commands resolved by match mode"), &["mode"]));
    register!(REGISTRY_CONFLICTS, IntCounterVec::new(Opts::new("usagi_registry_conflicts_total", "Module registration diagnostics by kind"), &["kind"]));
    register!(RESOLVE_LATENCY, Histogram::with_opts(
        HistogramOpts::new("usagi_resolve_duration_seconds", "Command resolution latency")
            .buckets(vec![0.000005, 0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

/// Count one resolution under its outcome label.
#[inline]
pub fn record_resolution(mode: &str) {
    if let Some(c) = RESOLUTIONS.get() {
        c.with_label_values(&[mode]).inc();
    }
}

#[inline]
pub fn record_resolve_latency(duration_secs: f64) {
    if let Some(h) = RESOLVE_LATENCY.get() {
        h.observe(duration_secs);
    }
}

/// Count one registration diagnostic.
#[inline]
pub fn record_registry_conflict(kind: &str) {
    if let Some(c) = REGISTRY_CONFLICTS.get() {
        c.with_label_values(&[kind]).inc();
    }
}
