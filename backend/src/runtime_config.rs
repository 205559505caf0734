// =============================================================================
// Service Configuration — JSON file + environment overrides
// =============================================================================
//
// Every field carries `#[serde(default)]` so a partial or empty file still
// loads. Environment variables win over the file:
//   RISK_BIND_ADDR   — listen address
//   RISK_MODELS_DIR  — directory holding the three artifacts
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::ModelPaths;

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding `logistic_model.json`, `decision_tree_model.json`
    /// and `scaler.json`.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            models_dir: default_models_dir(),
        }
    }
}

impl ServiceConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// Returns an error if the file is missing or malformed so the caller
    /// can fall back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read service config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse service config from {}", path.display()))?;

        info!(
            path = %path.display(),
            bind_addr = %config.bind_addr,
            models_dir = %config.models_dir.display(),
            "service config loaded"
        );

        Ok(config)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("RISK_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(dir) = lookup("RISK_MODELS_DIR").filter(|s| !s.trim().is_empty()) {
            self.models_dir = PathBuf::from(dir.trim());
        }
    }

    pub fn model_paths(&self) -> ModelPaths {
        ModelPaths::in_dir(&self.models_dir)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: ServiceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:8000");
        assert_eq!(cfg.models_dir, PathBuf::from("models"));
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "bind_addr": "127.0.0.1:9000" }"#;
        let cfg: ServiceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.model_paths().scaler, PathBuf::from("models").join("scaler.json"));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = ServiceConfig::default();
        cfg.apply_env(|key| match key {
            "RISK_BIND_ADDR" => Some(" 127.0.0.1:8123 ".to_string()),
            "RISK_MODELS_DIR" => Some("/srv/models".to_string()),
            _ => None,
        });
        assert_eq!(cfg.bind_addr, "127.0.0.1:8123");
        assert_eq!(
            cfg.model_paths().trend_model,
            PathBuf::from("/srv/models/logistic_model.json")
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = ServiceConfig::default();
        cfg.apply_env(|_| Some("   ".to_string()));
        assert_eq!(cfg.bind_addr, default_bind_addr());
        assert_eq!(cfg.models_dir, default_models_dir());
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(ServiceConfig::load("/definitely/not/here.json").is_err());
    }

    #[test]
    fn model_paths_use_standard_file_names() {
        let paths = ServiceConfig::default().model_paths();
        assert_eq!(paths.trend_model, PathBuf::from("models/logistic_model.json"));
        assert_eq!(paths.rule_model, PathBuf::from("models/decision_tree_model.json"));
        assert_eq!(paths.scaler, PathBuf::from("models/scaler.json"));
    }
}
