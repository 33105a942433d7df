//! HTTP surface.
//!
//! - `GET <route>?query=<cmd>[&incognito=true][&language=<tag>]` answers
//!   `303 See Other` with the resolved `Location`
//! - `GET /help` lists registered modules as plain text
//! - `GET /healthz` returns `ok`
//!
//! `/metrics` is served by a separate listener, see [`run_metrics_server`].

use crate::incognito::{self, Incognito};
use crate::metrics;
use crate::telemetry::ResolveTimer;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};
use usagi_core::{LAST_RESORT_URL, Locale, Preferences, Resolution, Resolver};

/// Query parameters of the redirect endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BunnyParams {
    pub query: Option<String>,
    pub incognito: Option<String>,
    pub language: Option<String>,
}

/// Shared per-request state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    resolver: Resolver,
    incognito: Arc<Incognito>,
    default_languages: Arc<[Locale]>,
}

impl AppState {
    pub fn new(resolver: Resolver, incognito: Incognito, default_languages: Vec<Locale>) -> Self {
        Self {
            resolver,
            incognito: Arc::new(incognito),
            default_languages: default_languages.into(),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// External preference list for one request.
    ///
    /// Order: `language` parameter, then `Accept-Language` by quality, then
    /// the configured defaults. An in-band override is put in front later,
    /// by the resolver.
    pub fn preferences(&self, language: Option<&str>, accept_language: Option<&str>) -> Preferences {
        let mut preferences = accept_language
            .map(Preferences::from_accept_language)
            .unwrap_or_default();

        if let Some(tag) = language.filter(|t| !t.trim().is_empty()) {
            match Locale::parse(tag) {
                Ok(locale) => preferences.prepend(locale),
                Err(e) => debug!(error = %e, "Ignoring language parameter"),
            }
        }

        preferences.extend(self.default_languages.iter().cloned());
        preferences
    }

    /// Resolve one redirect request.
    pub fn resolve_request(&self, params: &BunnyParams, accept_language: Option<&str>) -> Resolution {
        let raw = params.query.as_deref().unwrap_or_default();
        let (prefixed, command) = self.incognito.strip(raw);
        let incognito = prefixed || incognito::flag_enabled(params.incognito.as_deref());

        let resolution = if command.trim().is_empty() {
            self.resolver.fallback()
        } else {
            let preferences = self.preferences(params.language.as_deref(), accept_language);
            let _timer = ResolveTimer::new();
            self.resolver.resolve_raw(command, preferences)
        };

        metrics::record_resolution(resolution.outcome.label());

        if !incognito {
            info!(
                command = %command,
                url = %resolution.url,
                module = %resolution.module,
                mode = resolution.outcome.label(),
                language = resolution.language.as_ref().map(Locale::as_str),
                "Redirecting"
            );
        }

        resolution
    }
}

/// `303 See Other` to `url`.
fn see_other(url: &str) -> Response {
    let location = HeaderValue::from_str(url).unwrap_or_else(|e| {
        warn!(error = %e, "Resolved URL is not a valid Location header");
        HeaderValue::from_static(LAST_RESORT_URL)
    });
    (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
}

async fn bunny_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<BunnyParams>,
) -> Response {
    let accept_language = headers
        .get(header::ACCEPT_LANGUAGE)
        .and_then(|v| v.to_str().ok());
    let resolution = state.resolve_request(&params, accept_language);
    see_other(&resolution.url)
}

async fn help_handler(State(state): State<AppState>) -> String {
    state.resolver.registry().describe()
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Build the redirect router with the redirect endpoint mounted at `route`.
pub fn router(state: AppState, route: &str) -> Router {
    Router::new()
        .route(route, get(bunny_handler))
        .route("/help", get(help_handler))
        .route("/healthz", get(health_handler))
        .with_state(state)
}

/// Serve `app` on `listen` until `shutdown` resolves.
pub async fn serve<F>(listen: SocketAddr, app: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!(addr = %listener.local_addr()?, "Redirect HTTP server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}

/// Handler for GET /metrics - returns Prometheus metrics in text format.
async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

/// Run the HTTP server for Prometheus metrics.
///
/// Binds to `0.0.0.0:port` and serves `/metrics`. Long-running; spawn it.
pub async fn run_metrics_server(port: u16) {
    let app = Router::new().route("/metrics", get(metrics_handler));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Prometheus HTTP server listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind metrics server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Metrics server error: {}", e);
    }
}
