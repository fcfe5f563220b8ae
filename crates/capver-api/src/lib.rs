//! capver API /v1: read-only HTTP queries over the version registry
pub mod handlers;
pub mod metrics;
pub mod middleware;

use std::sync::Arc;

use axum::{routing::get, Router};
use capver_core::{RegistryConfig, SupportWindow, VersionRegistry};

pub use metrics::Metrics;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<VersionRegistry>,
    pub window: Arc<SupportWindow>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(registry: VersionRegistry, window: SupportWindow) -> Result<Self, prometheus::Error> {
        Ok(Self {
            registry: Arc::new(registry),
            window: Arc::new(window),
            metrics: Metrics::new()?,
        })
    }

    /// Build the registry and support window described by `config`.
    pub fn from_config(config: &RegistryConfig) -> anyhow::Result<Self> {
        let registry = config.build_registry()?;
        let window = config.support_window(&registry);
        tracing::info!(
            entries = registry.len(),
            ordering = %registry.ordering(),
            min_supported = %window.min_supported(),
            "capability version registry ready"
        );
        Ok(Self::new(registry, window)?)
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/lookup/version/{version}", get(handlers::lookup_version))
        .route("/v1/lookup/capver/{capver}", get(handlers::lookup_capver))
        .route("/v1/latest/versions", get(handlers::latest_versions))
        .route("/v1/latest/major-minor", get(handlers::latest_major_minor))
        .route("/v1/latest/capvers", get(handlers::latest_capvers))
        .route("/v1/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(middleware::cors())
        .layer(middleware::trace())
        .with_state(state)
}

pub async fn run(addr: &str, state: AppState) -> std::io::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("capver API listening on {}", addr);
    axum::serve(listener, app).await
}
