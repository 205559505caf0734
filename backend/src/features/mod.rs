// =============================================================================
// Feature Layout — the fixed 7-wide vector both models were fitted on
// =============================================================================
//
// The scaler and both classifiers were fitted outside this service on
// vectors in exactly this order. Nothing at runtime can prove the order is
// right; the loader checks the artifacts' dimensionality (and their
// `feature_names`, when exported) against `FEATURE_ORDER` and refuses to
// start on a mismatch.
//
// Any change to the order or the set of features MUST bump
// `FEATURE_LAYOUT_VERSION` and ship with re-exported artifacts.
// =============================================================================

pub mod validate;

use serde::Serialize;

pub use validate::{validate, ValidationError};

/// Version of the feature layout below.
pub const FEATURE_LAYOUT_VERSION: u32 = 1;

/// Feature names in the exact order they appear in every vector.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "attendance",            // 0: percentage, [0, 100]
    "study_hours",           // 1: hours per week, >= 0
    "assignments_completed", // 2: count, >= 0
    "quiz_score",            // 3: average quiz score, [0, 100]
    "midterm_score",         // 4: midterm exam score, [0, 100]
    "internet_access",       // 5: 0 = no, 1 = yes
    "past_failures",         // 6: count of failed courses, >= 0
];

pub const FEATURE_COUNT: usize = 7;

/// Returns `true` if an artifact's exported feature names match the layout.
pub fn matches_layout(names: &[String]) -> bool {
    names.len() == FEATURE_COUNT
        && names
            .iter()
            .zip(FEATURE_ORDER.iter())
            .all(|(got, want)| got == want)
}

// =============================================================================
// RawFeatures
// =============================================================================

/// One student's validated indicators, as submitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawFeatures {
    pub attendance: f64,
    pub study_hours: f64,
    pub assignments_completed: u32,
    pub quiz_score: f64,
    pub midterm_score: f64,
    pub internet_access: u8,
    pub past_failures: u32,
}

impl RawFeatures {
    /// Assemble the model input in `FEATURE_ORDER`.
    pub fn to_vector(&self) -> FeatureVector {
        FeatureVector::new(vec![
            self.attendance,
            self.study_hours,
            f64::from(self.assignments_completed),
            self.quiz_score,
            self.midterm_score,
            f64::from(self.internet_access),
            f64::from(self.past_failures),
        ])
    }

    pub fn has_internet_access(&self) -> bool {
        self.internet_access == 1
    }
}

// =============================================================================
// FeatureVector
// =============================================================================

/// Ordered numeric input to the scaler and the models.
///
/// Width is not enforced here; consumers check it and report a
/// `ModelError` so a malformed vector surfaces as an internal fault.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector(Vec<f64>);

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

// =============================================================================
// Tests
// =============================================================================
