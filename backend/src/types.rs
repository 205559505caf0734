// =============================================================================
// Shared types used across the risk service
// =============================================================================

use serde::Serialize;

/// Which of the two classifiers produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Logistic-regression-style model scored on standardized features.
    TrendBased,
    /// Decision-path model scored on raw features.
    RuleBased,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrendBased => write!(f, "trend-based"),
            Self::RuleBased => write!(f, "rule-based"),
        }
    }
}

/// One model's answer for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelVerdict {
    /// 0 = not at risk, 1 = at risk.
    pub prediction: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_probability: Option<f64>,
    pub explanation: String,
}

/// Combined answer returned over the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    #[serde(rename = "logistic_regression")]
    pub trend_based: ModelVerdict,
    #[serde(rename = "decision_tree")]
    pub rule_based: ModelVerdict,
}
