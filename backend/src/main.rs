// =============================================================================
// Student Academic Risk Service — Main Entry Point
// =============================================================================
//
// Models are loaded before the listener binds. A failure to load any of the
// three artifacts aborts startup; the service never serves with a partial
// set.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod error;
mod explain;
mod features;
mod models;
mod orchestrator;
mod runtime_config;
mod types;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::models::LoadedModels;
use crate::runtime_config::ServiceConfig;

const CONFIG_PATH: &str = "service_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "Student risk service starting");

    let mut config = ServiceConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ServiceConfig::default()
    });
    config.apply_env(|key| std::env::var(key).ok());

    // ── 2. Load models (fatal on failure) ────────────────────────────────
    let paths = config.model_paths();
    let models = LoadedModels::load(&paths).context("model loading failed, refusing to start")?;

    // ── 3. Build shared state ────────────────────────────────────────────
    let state = Arc::new(AppState::new(config));
    state.install_models(models);

    // ── 4. Start the API server ──────────────────────────────────────────
    let bind_addr = state.config.bind_addr.clone();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {bind_addr}"))?;
    info!(addr = %bind_addr, "API server listening");

    let app = api::rest::router(state.clone());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!(
        predictions_served = state
            .predictions_served
            .load(std::sync::atomic::Ordering::Relaxed),
        "Student risk service shut down complete."
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
