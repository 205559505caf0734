// =============================================================================
// Prediction Orchestrator — one request, both models, one response
// =============================================================================
//
//   validate → RawFeatures → FeatureVector
//            → scale (trend model only) → trend predict + probability
//            → rule predict on the raw vector
//            → explain ×2 → PredictionResponse
//
// Validation happens before any model is touched. The loaded models are
// shared read-only; nothing here mutates them, so a failing request cannot
// affect any other.
// =============================================================================

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::{InternalError, PredictionError};
use crate::explain::explain;
use crate::features::{validate, RawFeatures};
use crate::models::{LoadedModels, ModelError};
use crate::types::{ModelVerdict, PredictionResponse};

pub struct PredictionOrchestrator {
    models: Arc<LoadedModels>,
}

impl PredictionOrchestrator {
    pub fn new(models: Arc<LoadedModels>) -> Self {
        Self { models }
    }

    /// Run the full pipeline on a raw request payload.
    pub fn handle(&self, payload: &Value) -> Result<PredictionResponse, PredictionError> {
        let raw = validate(payload)?;
        Ok(self.predict(&raw)?)
    }

    /// Score already-validated features.
    pub fn predict(&self, raw: &RawFeatures) -> Result<PredictionResponse, InternalError> {
        let m = &*self.models;
        let x = raw.to_vector();

        let scaled = m.scaler.scale(&x).map_err(InternalError::Scaler)?;

        let trend_kind = m.trend_model.kind();
        let trend_err = |source: ModelError| InternalError::Model {
            kind: trend_kind,
            source,
        };
        let trend_prediction = m.trend_model.predict(&scaled).map_err(trend_err)?;
        let probability = m
            .trend_model
            .predict_probability(&scaled)
            .ok_or(InternalError::MissingProbability(trend_kind))?
            .map_err(trend_err)?;

        let rule_kind = m.rule_model.kind();
        let rule_prediction = m
            .rule_model
            .predict(&x)
            .map_err(|source| InternalError::Model {
                kind: rule_kind,
                source,
            })?;

        debug!(
            trend_model = %trend_kind,
            trend_prediction,
            probability,
            rule_model = %rule_kind,
            rule_prediction,
            "models scored"
        );

        Ok(PredictionResponse {
            trend_based: ModelVerdict {
                prediction: trend_prediction,
                risk_probability: Some(round2(probability.clamp(0.0, 1.0))),
                explanation: explain(raw, trend_kind, trend_prediction),
            },
            rule_based: ModelVerdict {
                prediction: rule_prediction,
                risk_probability: None,
                explanation: explain(raw, rule_kind, rule_prediction),
            },
        })
    }
}

fn round2(p: f64) -> f64 {
    (p * 100.0).round() / 100.0
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use crate::features::FeatureVector;
    use crate::models::loader::tests::bundled_dir;
    use crate::models::{LogisticModel, ModelError, ModelPaths, RiskModel, StandardScaler};
    use crate::types::ModelKind;

    pub(crate) fn bundled() -> Arc<LoadedModels> {
        Arc::new(LoadedModels::load(&ModelPaths::in_dir(bundled_dir())).unwrap())
    }

    fn scenario_a() -> Value {
        json!({
            "attendance": 85.5,
            "study_hours": 10.0,
            "assignments_completed": 8,
            "quiz_score": 75.0,
            "midterm_score": 80.0,
            "internet_access": 1,
            "past_failures": 0
        })
    }

    /// Counts invocations and returns a fixed answer.
    struct CountingModel {
        kind: ModelKind,
        calls: Arc<AtomicUsize>,
        probability: Option<f64>,
    }

    impl RiskModel for CountingModel {
        fn kind(&self) -> ModelKind {
            self.kind
        }

        fn predict(&self, _x: &FeatureVector) -> Result<u8, ModelError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        }

        fn predict_probability(&self, _x: &FeatureVector) -> Option<Result<f64, ModelError>> {
            self.probability.map(Ok)
        }
    }

    fn counting_models(trend_probability: Option<f64>) -> (PredictionOrchestrator, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let models = LoadedModels::new(
            Box::new(CountingModel {
                kind: ModelKind::TrendBased,
                calls: calls.clone(),
                probability: trend_probability,
            }),
            Box::new(CountingModel {
                kind: ModelKind::RuleBased,
                calls: calls.clone(),
                probability: None,
            }),
            StandardScaler::new(vec![0.0; 7], vec![1.0; 7]).unwrap(),
        );
        (PredictionOrchestrator::new(Arc::new(models)), calls)
    }

    #[test]
    fn scenario_a_not_at_risk() {
        let resp = PredictionOrchestrator::new(bundled()).handle(&scenario_a()).unwrap();

        assert_eq!(resp.trend_based.prediction, 0);
        assert!(resp.trend_based.risk_probability.unwrap() < 0.5);
        assert_eq!(resp.rule_based.prediction, 0);
        assert!(resp.rule_based.risk_probability.is_none());
        assert!(resp.rule_based.explanation.contains("no past failures"));
        assert!(resp.rule_based.explanation.contains("internet access available"));
    }

    #[test]
    fn scenario_b_trend_at_risk() {
        let mut payload = scenario_a();
        payload["midterm_score"] = json!(40.0);
        payload["quiz_score"] = json!(45.0);
        payload["study_hours"] = json!(2.0);
        payload["attendance"] = json!(40.0);

        let resp = PredictionOrchestrator::new(bundled()).handle(&payload).unwrap();

        assert_eq!(resp.trend_based.prediction, 1);
        assert!(resp.trend_based.risk_probability.unwrap() > 0.5);
        for factor in ["midterm", "quiz", "study hours", "attendance"] {
            assert!(resp.trend_based.explanation.contains(factor), "{factor}");
        }
    }

    #[test]
    fn scenario_c_rule_at_risk() {
        let mut payload = scenario_a();
        payload["past_failures"] = json!(3);
        payload["internet_access"] = json!(0);

        let resp = PredictionOrchestrator::new(bundled()).handle(&payload).unwrap();

        assert_eq!(resp.rule_based.prediction, 1);
        assert!(resp.rule_based.explanation.contains("3 past failures"));
        assert!(resp.rule_based.explanation.contains("no internet access"));
    }

    #[test]
    fn identical_input_gives_identical_response() {
        let o = PredictionOrchestrator::new(bundled());
        let first = o.handle(&scenario_a()).unwrap();
        for _ in 0..10 {
            assert_eq!(o.handle(&scenario_a()).unwrap(), first);
        }
    }

    #[test]
    fn probability_is_rounded_and_bounded() {
        let o = PredictionOrchestrator::new(bundled());
        let mut payload = scenario_a();
        for midterm in [0.0, 25.0, 50.0, 69.0, 100.0] {
            payload["midterm_score"] = json!(midterm);
            let p = o.handle(&payload).unwrap().trend_based.risk_probability.unwrap();
            assert!((0.0..=1.0).contains(&p));
            assert_eq!(p, round2(p));
        }
    }

    #[test]
    fn invalid_input_touches_no_model() {
        let (o, calls) = counting_models(Some(0.9));
        for (field, value) in [
            ("attendance", json!(150)),
            ("internet_access", json!(2)),
            ("past_failures", json!(-1)),
            ("quiz_score", json!("abc")),
        ] {
            let mut payload = scenario_a();
            payload[field] = value;
            let err = o.handle(&payload).unwrap_err();
            assert!(err.is_validation(), "{field}");
        }

        let mut payload = scenario_a();
        payload.as_object_mut().unwrap().remove("midterm_score");
        assert!(o.handle(&payload).unwrap_err().is_validation());

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn valid_input_scores_both_models_once() {
        let (o, calls) = counting_models(Some(0.876));
        let resp = o.handle(&scenario_a()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resp.trend_based.risk_probability, Some(0.88));
    }

    #[test]
    fn huge_study_hours_is_scored_not_rejected() {
        let calls = Arc::new(AtomicUsize::new(0));
        let models = LoadedModels::new(
            Box::new(
                LogisticModel::new(vec![-1.2, -0.9, -0.5, -1.1, -1.4, -0.3, 0.8], -1.0).unwrap(),
            ),
            Box::new(CountingModel {
                kind: ModelKind::RuleBased,
                calls: calls.clone(),
                probability: None,
            }),
            StandardScaler::new(
                vec![75.0, 8.0, 7.0, 70.0, 70.0, 0.8, 0.5],
                vec![15.0, 0.5, 2.0, 15.0, 15.0, 0.4, 0.8],
            )
            .unwrap(),
        );
        let o = PredictionOrchestrator::new(Arc::new(models));

        let mut payload = scenario_a();
        payload["study_hours"] = json!(1.0e308);
        let resp = o.handle(&payload).unwrap();

        assert_eq!(resp.trend_based.prediction, 0);
        assert_eq!(resp.trend_based.risk_probability, Some(0.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_probability_is_internal() {
        let (o, _) = counting_models(None);
        let err = o.handle(&scenario_a()).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Internal(InternalError::MissingProbability(ModelKind::TrendBased))
        ));
    }
}
