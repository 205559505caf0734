// =============================================================================
// Request-path errors
// =============================================================================
//
// Two kinds, never mixed:
//   - Validation — the caller's input is wrong; reported with field detail.
//   - Internal   — our fault; the handler logs it in full, the caller only
//                  sees an opaque status.
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::features::ValidationError;
use crate::models::ModelError;
use crate::types::ModelKind;

#[derive(Debug, thiserror::Error)]
pub enum InternalError {
    #[error("models are not loaded yet")]
    NotReady,
    #[error("{kind} model failed: {source}")]
    Model {
        kind: ModelKind,
        #[source]
        source: ModelError,
    },
    #[error("scaler failed: {0}")]
    Scaler(#[source] ModelError),
    #[error("{0} model does not provide a risk probability")]
    MissingProbability(ModelKind),
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Internal(#[from] InternalError),
}

impl PredictionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl IntoResponse for PredictionError {
    fn into_response(self) -> Response {
        match self {
            Self::Validation(e) => {
                let body = json!({
                    "error": "validation_failed",
                    "details": e.violations,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            Self::Internal(e) => {
                let status = match e {
                    InternalError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let body = json!({ "error": "internal_error" });
                (status, Json(body)).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::validate::FieldViolation;

    #[test]
    fn validation_maps_to_422() {
        let err = PredictionError::from(ValidationError {
            violations: vec![FieldViolation {
                field: "attendance".into(),
                message: "must be between 0 and 100".into(),
            }],
        });
        assert!(err.is_validation());
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_maps_to_500_or_503() {
        let err = PredictionError::from(InternalError::MissingProbability(ModelKind::TrendBased));
        assert!(!err.is_validation());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = PredictionError::from(InternalError::NotReady);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn internal_body_carries_no_detail() {
        let err = PredictionError::from(InternalError::Model {
            kind: ModelKind::RuleBased,
            source: ModelError::NonFinite { component: "decision tree", index: 3 },
        });
        let detail = err.to_string();
        assert!(detail.contains("rule-based"));

        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "internal_error" }));
    }
}
