// =============================================================================
// Models Module
// =============================================================================
//
// Already-trained artifacts, loaded once at startup:
// - StandardScaler   — per-feature (x - mean) / scale
// - LogisticModel    — trend-based classifier, exposes a probability
// - DecisionTreeModel — rule-based classifier, label only
//
// Both classifiers sit behind `RiskModel`; the probability is an optional
// capability rather than a separate type hierarchy.

pub mod decision_tree;
pub mod loader;
pub mod logistic;
pub mod scaler;

use crate::features::{FeatureVector, FEATURE_COUNT};
use crate::types::ModelKind;

pub use decision_tree::DecisionTreeModel;
pub use loader::{ArtifactInfo, LoadedModels, ModelPaths};
pub use logistic::LogisticModel;
pub use scaler::StandardScaler;

/// Misuse of a loaded model or scaler. Always a programming or artifact
/// fault, never the caller's.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{component} expects {expected} features, got {got}")]
    Dimension {
        component: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{component} received a non-finite value at feature index {index}")]
    NonFinite {
        component: &'static str,
        index: usize,
    },
}

/// Check that a vector is the width every artifact was fitted on and holds
/// only finite values.
pub(crate) fn check_input(component: &'static str, x: &FeatureVector) -> Result<(), ModelError> {
    if x.len() != FEATURE_COUNT {
        return Err(ModelError::Dimension {
            component,
            expected: FEATURE_COUNT,
            got: x.len(),
        });
    }
    if let Some(index) = x.values().iter().position(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite { component, index });
    }
    Ok(())
}

/// An opaque, already-trained binary classifier.
pub trait RiskModel: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Predicted class: 0 = not at risk, 1 = at risk.
    fn predict(&self, x: &FeatureVector) -> Result<u8, ModelError>;

    /// Probability of the "at risk" class, for models that produce one.
    fn predict_probability(&self, _x: &FeatureVector) -> Option<Result<f64, ModelError>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_input_rejects_wrong_width() {
        let err = check_input("scaler", &FeatureVector::new(vec![1.0; 6])).unwrap_err();
        assert_eq!(
            err,
            ModelError::Dimension {
                component: "scaler",
                expected: 7,
                got: 6
            }
        );
    }

    #[test]
    fn check_input_rejects_nan() {
        let mut values = vec![0.0; FEATURE_COUNT];
        values[4] = f64::NAN;
        let err = check_input("tree", &FeatureVector::new(values)).unwrap_err();
        assert_eq!(err, ModelError::NonFinite { component: "tree", index: 4 });
    }
}
