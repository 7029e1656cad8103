//! Flood Risk API Server
//!
//! Serves flood-risk predictions from the artifacts written by the `train`
//! job.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      FLOOD RISK API                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌─────────────────┐   ┌─────────────────┐  │
//! │  │  API      │──▶│  Validation     │──▶│  Inference      │  │
//! │  │  (Axum)   │   │  (no artifacts) │   │  (ArtifactSlot) │  │
//! │  └───────────┘   └─────────────────┘   └────────┬────────┘  │
//! │                                                 ▼           │
//! │                         model.json / scaler.json /          │
//! │                         feature_columns.json                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Missing artifacts do not stop the server: it starts degraded and keeps
//! trying to load them on prediction requests and on admin reload.

mod config;
mod error;
mod handlers;
mod state;


use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};
pub use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "flood_risk_api=debug,flood_risk_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = config::Config::from_env();

    tracing::info!("Flood Risk API starting...");
    tracing::info!("Artifacts: {}", config.artifact_dir.display());

    let state = AppState::new(config.clone());

    match state.store.load_bundle() {
        Ok(bundle) => {
            tracing::info!(
                "Model loaded ({} features, layout hash {:08x})",
                bundle.feature_order().len(),
                bundle.feature_order().layout_hash()
            );
            state.artifacts.replace(bundle);
        }
        Err(e) if e.is_missing() => {
            tracing::warn!("Artifacts not found ({}) - starting in degraded mode", e);
        }
        Err(e) => {
            tracing::error!("Failed to load artifacts: {} - starting in degraded mode", e);
        }
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health/", get(handlers::health::check))
        .route(
            "/api/predict/",
            post(handlers::predict::predict).fallback(handlers::post_only),
        )
        .route("/api/model/", get(handlers::model::status))
        .route(
            "/api/admin/reload/",
            post(handlers::admin::reload).fallback(handlers::post_only),
        )
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
