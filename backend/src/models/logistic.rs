// =============================================================================
// Logistic Model — trend-based classifier over standardized features
// =============================================================================

use anyhow::{bail, Result};
use serde::Deserialize;

use super::{check_input, ModelError, RiskModel};
use crate::features::{matches_layout, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
use crate::types::ModelKind;

/// On-disk form of the fitted logistic regression.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LogisticModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LogisticModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        if coefficients.len() != FEATURE_COUNT {
            bail!(
                "logistic model has {} coefficients, service layout has {} features",
                coefficients.len(),
                FEATURE_COUNT
            );
        }
        if !intercept.is_finite() || coefficients.iter().any(|w| !w.is_finite()) {
            bail!("logistic model parameters are not finite");
        }
        let mut w = [0.0; FEATURE_COUNT];
        w.copy_from_slice(&coefficients);
        Ok(Self {
            coefficients: w,
            intercept,
        })
    }

    pub fn from_artifact(artifact: LogisticArtifact) -> Result<Self> {
        if let Some(names) = &artifact.feature_names {
            if !matches_layout(names) {
                bail!(
                    "logistic model feature order {:?} does not match {:?}",
                    names,
                    FEATURE_ORDER
                );
            }
        }
        Self::new(artifact.coefficients, artifact.intercept)
    }

    /// Signed distance from the decision boundary.
    ///
    /// Each term saturates at the finite range, so the sum may reach
    /// +/-inf but never NaN.
    pub fn decision_function(&self, x: &FeatureVector) -> Result<f64, ModelError> {
        check_input("logistic model", x)?;
        Ok(self.intercept
            + x.values()
                .iter()
                .zip(self.coefficients.iter())
                .map(|(v, w)| (v * w).clamp(f64::MIN, f64::MAX))
                .sum::<f64>())
    }
}

fn sigmoid(z: f64) -> f64 {
    // Split on sign so exp() never overflows.
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl RiskModel for LogisticModel {
    fn kind(&self) -> ModelKind {
        ModelKind::TrendBased
    }

    fn predict(&self, x: &FeatureVector) -> Result<u8, ModelError> {
        Ok(u8::from(self.decision_function(x)? > 0.0))
    }

    fn predict_probability(&self, x: &FeatureVector) -> Option<Result<f64, ModelError>> {
        Some(self.decision_function(x).map(sigmoid))
    }
}
