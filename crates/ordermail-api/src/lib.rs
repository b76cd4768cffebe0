//! Ordermail API: form page, email generation, health and metrics
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub use config::ServerConfig;
use metrics::Metrics;

/// State shared by all handlers; read-only apart from the counters
pub struct AppState {
    pub config: ServerConfig,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Result<Self, prometheus::Error> {
        Ok(Self {
            config,
            metrics: Metrics::new()?,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    let form = ServeFile::new(state.config.form_path());
    let assets = ServeDir::new(&state.config.views_dir);

    Router::new()
        .route_service("/", form)
        .route("/generate", post(handlers::generate))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .fallback_service(assets)
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let addr = config.addr.clone();
    tracing::info!(
        template = %config.template_path.display(),
        views = %config.views_dir.display(),
        "configuration loaded"
    );

    let state = AppState::new(config).map_err(|e| anyhow::anyhow!("metrics registry: {}", e))?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Ordermail API listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
