//! Recognition service HTTP server.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, instrument, warn};

use grantha_config::ServiceConfig;
use grantha_core::{GENERATE_PATH, HEALTH_PATH};
use grantha_understanding::VisionModel;

use crate::{control_ui, generate, health_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub model: Arc<dyn VisionModel>,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(model: Arc<dyn VisionModel>) -> Self {
        Self {
            model,
            started_at: Instant::now(),
        }
    }
}

/// API routes, optional static client hosting, and the shared layers.
pub fn build_router(state: GatewayState, static_dir: Option<&Path>, body_limit: usize) -> Router {
    let mut app = Router::new()
        .route(GENERATE_PATH, post(generate::generate))
        .route(HEALTH_PATH, get(health_api::get_health))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app.fallback_service(control_ui::spa_service(dir));
    }

    app.layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until Ctrl-C.
#[instrument(skip_all, fields(addr = %config.addr()))]
pub async fn start_server(config: &ServiceConfig, state: GatewayState) -> Result<()> {
    let static_dir = if config.static_dir.is_dir() {
        Some(config.static_dir.as_path())
    } else {
        warn!(dir = %config.static_dir.display(), "Static directory not found; web client disabled");
        None
    };
    let app = build_router(state, static_dir, config.body_limit_bytes);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Grantha service listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Grantha service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
