//! usagid - the usagi redirect daemon.

use anyhow::Context;
use std::sync::Arc;
use tracing::{error, info, warn};
use usagi::commands;
use usagi::config::{self, Config};
use usagi::http::{self, AppState};
use usagi::incognito::Incognito;
use usagi::metrics;
use usagi::telemetry;
use usagi_core::{Locale, Resolver};

const DEFAULT_CONFIG_PATH: &str = "usagi.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // An explicit path must exist; the default path may be absent.
    let config = match std::env::args().nth(1) {
        Some(path) => {
            Config::load(&path).with_context(|| format!("failed to load config {path}"))?
        }
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)
            .with_context(|| format!("failed to load config {DEFAULT_CONFIG_PATH}"))?,
    };

    telemetry::init_tracing(&config.logging);

    if let Err(errors) = config::validate(&config, &commands::names()) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        listen = %config.server.listen,
        route = %config.server.route,
        "Starting usagid"
    );

    metrics::init();

    let registry = commands::build_registry(&config.modules.disabled);
    for diagnostic in registry.diagnostics() {
        warn!(module = %diagnostic.module(), error = %diagnostic, "Registry diagnostic");
        metrics::record_registry_conflict(diagnostic.error_code());
    }

    let incognito = Incognito::new(&config.incognito.keywords)
        .context("failed to build incognito matcher")?;
    // Validated above.
    let default_languages = config
        .modules
        .default_languages
        .iter()
        .filter_map(|tag| Locale::parse(tag).ok())
        .collect();

    let state = AppState::new(Resolver::new(Arc::new(registry)), incognito, default_languages);

    if let Some(port) = config.server.metrics_port.filter(|&p| p != 0) {
        tokio::spawn(http::run_metrics_server(port));
    }

    let app = http::router(state, &config.server.route);
    http::serve(config.server.listen, app, shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("usagid stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
