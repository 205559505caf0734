// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
//   GET  /         — service info
//   GET  /health   — liveness + readiness (503 until models are installed)
//   GET  /models   — provenance of the loaded artifacts
//   POST /predict  — score one student with both models
//
// CORS is permissive so the browser form can call the API from any origin.
// =============================================================================

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::app_state::AppState;
use crate::error::{InternalError, PredictionError};
use crate::features::{ValidationError, FEATURE_COUNT, FEATURE_LAYOUT_VERSION, FEATURE_ORDER};
use crate::models::ArtifactInfo;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/models", get(models))
        .route("/predict", post(predict))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Root
// =============================================================================

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Student Academic Risk Prediction API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "predict": "/predict (POST)",
            "health": "/health",
            "models": "/models",
        },
    }))
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    models_loaded: bool,
    uptime_seconds: u64,
    predictions_served: u64,
    validation_failures: u64,
    internal_failures: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ready = state.is_ready();
    let resp = HealthResponse {
        status: if ready { "healthy" } else { "starting" },
        models_loaded: ready,
        uptime_seconds: state.uptime_secs(),
        predictions_served: state.predictions_served.load(Ordering::Relaxed),
        validation_failures: state.validation_failures.load(Ordering::Relaxed),
        internal_failures: state.internal_failures.load(Ordering::Relaxed),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(resp))
}

// =============================================================================
// Models
// =============================================================================

#[derive(Serialize)]
struct ModelsResponse {
    feature_layout_version: u32,
    feature_order: [&'static str; FEATURE_COUNT],
    loaded_at: String,
    artifacts: Vec<ArtifactInfo>,
}

async fn models(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, PredictionError> {
    let Some(models) = state.models() else {
        warn!("model metadata requested before models were loaded");
        return Err(InternalError::NotReady.into());
    };
    Ok(Json(ModelsResponse {
        feature_layout_version: FEATURE_LAYOUT_VERSION,
        feature_order: FEATURE_ORDER,
        loaded_at: models.loaded_at.to_rfc3339(),
        artifacts: models.artifacts.clone(),
    }))
}

// =============================================================================
// Predict
// =============================================================================

async fn predict(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, PredictionError> {
    let request_id = uuid::Uuid::new_v4();

    let result = serde_json::from_slice::<Value>(&body)
        .map_err(|e| PredictionError::from(ValidationError::body(format!("malformed JSON: {e}"))))
        .and_then(|payload| {
            let orchestrator = state.orchestrator().ok_or(InternalError::NotReady)?;
            orchestrator.handle(&payload)
        });

    match result {
        Ok(resp) => {
            state.record_success();
            info!(
                request_id = %request_id,
                trend_prediction = resp.trend_based.prediction,
                risk_probability = ?resp.trend_based.risk_probability,
                rule_prediction = resp.rule_based.prediction,
                "prediction served"
            );
            Ok(Json(resp))
        }
        Err(e) => {
            state.record_failure(e.is_validation());
            match &e {
                PredictionError::Validation(v) => info!(
                    request_id = %request_id,
                    fields = ?v.fields().collect::<Vec<_>>(),
                    "prediction rejected"
                ),
                PredictionError::Internal(i) => error!(
                    request_id = %request_id,
                    error = %i,
                    detail = ?i,
                    "prediction aborted by internal error"
                ),
            }
            Err(e)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
