// =============================================================================
// Model Loader — one-shot startup load of the three trained artifacts
// =============================================================================
//
// Produces the read-only `LoadedModels` handle shared by every request. Any
// failure here is fatal: the caller must not bind the listener with a
// partially loaded set.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use super::decision_tree::DecisionTreeArtifact;
use super::logistic::LogisticArtifact;
use super::scaler::ScalerArtifact;
use super::{DecisionTreeModel, LogisticModel, RiskModel, StandardScaler};
use crate::features::{FEATURE_LAYOUT_VERSION, FEATURE_ORDER};

/// Where to find each artifact.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub trend_model: PathBuf,
    pub rule_model: PathBuf,
    pub scaler: PathBuf,
}

impl ModelPaths {
    /// Standard file names inside a models directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            trend_model: dir.join("logistic_model.json"),
            rule_model: dir.join("decision_tree_model.json"),
            scaler: dir.join("scaler.json"),
        }
    }
}

/// Provenance of one loaded artifact, exposed on `/models`.
#[derive(Debug, Clone, Serialize)]
pub struct ArtifactInfo {
    pub name: &'static str,
    pub path: String,
    pub sha256: String,
}

/// Everything the pipeline needs, immutable once built.
pub struct LoadedModels {
    pub trend_model: Box<dyn RiskModel>,
    pub rule_model: Box<dyn RiskModel>,
    pub scaler: StandardScaler,
    pub artifacts: Vec<ArtifactInfo>,
    pub loaded_at: DateTime<Utc>,
}

impl LoadedModels {
    /// Assemble from already-constructed parts.
    pub fn new(
        trend_model: Box<dyn RiskModel>,
        rule_model: Box<dyn RiskModel>,
        scaler: StandardScaler,
    ) -> Self {
        Self {
            trend_model,
            rule_model,
            scaler,
            artifacts: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    /// Load and verify all three artifacts.
    pub fn load(paths: &ModelPaths) -> Result<Self> {
        let (trend, trend_info) = read_artifact::<LogisticArtifact>("trend_model", &paths.trend_model)?;
        let trend = LogisticModel::from_artifact(trend)
            .with_context(|| format!("invalid trend model in {}", paths.trend_model.display()))?;

        let (rule, rule_info) =
            read_artifact::<DecisionTreeArtifact>("rule_model", &paths.rule_model)?;
        let rule = DecisionTreeModel::from_artifact(rule)
            .with_context(|| format!("invalid rule model in {}", paths.rule_model.display()))?;

        let (scaler, scaler_info) = read_artifact::<ScalerArtifact>("scaler", &paths.scaler)?;
        let scaler = StandardScaler::from_artifact(scaler)
            .with_context(|| format!("invalid scaler in {}", paths.scaler.display()))?;

        info!(
            layout_version = FEATURE_LAYOUT_VERSION,
            features = ?FEATURE_ORDER,
            tree_nodes = rule.node_count(),
            tree_depth = rule.depth(),
            "all models loaded"
        );

        let mut models = Self::new(Box::new(trend), Box::new(rule), scaler);
        models.artifacts = vec![trend_info, rule_info, scaler_info];
        Ok(models)
    }
}

fn read_artifact<T: DeserializeOwned>(name: &'static str, path: &Path) -> Result<(T, ArtifactInfo)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read {} from {}", name, path.display()))?;
    let parsed: T = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse {} from {}", name, path.display()))?;

    let sha256 = hex::encode(Sha256::digest(&bytes));
    info!(artifact = name, path = %path.display(), sha256 = %sha256, "artifact read");

    Ok((
        parsed,
        ArtifactInfo {
            name,
            path: path.display().to_string(),
            sha256,
        },
    ))
}

// =============================================================================
// Tests
// =============================================================================
