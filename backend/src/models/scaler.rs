// =============================================================================
// Standard Scaler — (x - mean) / scale with parameters fixed at training time
// =============================================================================

use anyhow::{bail, Result};
use serde::Deserialize;

use super::{check_input, ModelError};
use crate::features::{matches_layout, FeatureVector, FEATURE_COUNT, FEATURE_ORDER};

/// On-disk form of the fitted scaler.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// Build a scaler, rejecting parameters that would make `scale` partial.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self> {
        if mean.len() != FEATURE_COUNT || scale.len() != FEATURE_COUNT {
            bail!(
                "scaler was fitted on {} means / {} scales, service layout has {} features",
                mean.len(),
                scale.len(),
                FEATURE_COUNT
            );
        }
        for (i, (m, s)) in mean.iter().zip(scale.iter()).enumerate() {
            if !m.is_finite() || !s.is_finite() {
                bail!("scaler parameters for '{}' are not finite", FEATURE_ORDER[i]);
            }
            if *s == 0.0 {
                bail!("scaler scale for '{}' is zero", FEATURE_ORDER[i]);
            }
        }

        let mut m = [0.0; FEATURE_COUNT];
        let mut s = [0.0; FEATURE_COUNT];
        m.copy_from_slice(&mean);
        s.copy_from_slice(&scale);
        Ok(Self { mean: m, scale: s })
    }

    pub fn from_artifact(artifact: ScalerArtifact) -> Result<Self> {
        if let Some(names) = &artifact.feature_names {
            if !matches_layout(names) {
                bail!("scaler feature order {:?} does not match {:?}", names, FEATURE_ORDER);
            }
        }
        Self::new(artifact.mean, artifact.scale)
    }

    /// Standardize a raw vector.
    ///
    /// Results saturate at the finite `f64` range, so a huge but valid raw
    /// value stays usable downstream.
    pub fn scale(&self, x: &FeatureVector) -> Result<FeatureVector, ModelError> {
        check_input("scaler", x)?;
        let scaled = x
            .values()
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(v, (m, s))| ((v - m) / s).clamp(f64::MIN, f64::MAX))
            .collect();
        Ok(FeatureVector::new(scaled))
    }

    /// Undo `scale`.
    #[cfg(test)]
    pub fn inverse(&self, x: &FeatureVector) -> Result<FeatureVector, ModelError> {
        check_input("scaler", x)?;
        let raw = x
            .values()
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(v, (m, s))| v * s + m)
            .collect();
        Ok(FeatureVector::new(raw))
    }
}
