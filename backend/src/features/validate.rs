// =============================================================================
// Input Validation — request payload → RawFeatures
// =============================================================================
//
// Every field is required. A value may be a JSON number or a string that
// parses as one. Integer fields reject fractional values.
//
// All violations are collected and reported together, in feature order, so
// a form can highlight every bad field in one round trip.
// =============================================================================

use serde::Serialize;
use serde_json::{Map, Value};

use super::RawFeatures;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// User-correctable input error carrying every violated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid input: {}", summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn body(message: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation::new("body", message)],
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.violations.iter().map(|v| v.field.as_str())
    }
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{}: {}", v.field, v.message))
        .collect::<Vec<_>>()
        .join("; ")
}

// =============================================================================
// Validation
// =============================================================================

/// Validate a request payload into `RawFeatures`.
pub fn validate(payload: &Value) -> Result<RawFeatures, ValidationError> {
    let obj = payload
        .as_object()
        .ok_or_else(|| ValidationError::body("expected a JSON object"))?;

    let mut violations = Vec::new();

    let attendance = percentage(obj, "attendance", &mut violations);
    let study_hours = non_negative_float(obj, "study_hours", &mut violations);
    let assignments_completed = count(obj, "assignments_completed", &mut violations);
    let quiz_score = percentage(obj, "quiz_score", &mut violations);
    let midterm_score = percentage(obj, "midterm_score", &mut violations);
    let internet_access = flag(obj, "internet_access", &mut violations);
    let past_failures = count(obj, "past_failures", &mut violations);

    match (
        attendance,
        study_hours,
        assignments_completed,
        quiz_score,
        midterm_score,
        internet_access,
        past_failures,
    ) {
        (Some(a), Some(s), Some(ac), Some(q), Some(m), Some(i), Some(p))
            if violations.is_empty() =>
        {
            Ok(RawFeatures {
                attendance: a,
                study_hours: s,
                assignments_completed: ac,
                quiz_score: q,
                midterm_score: m,
                internet_access: i,
                past_failures: p,
            })
        }
        _ => Err(ValidationError { violations }),
    }
}

/// Read a field as a finite number, accepting numeric strings.
fn number(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) -> Option<f64> {
    let parsed = match obj.get(field) {
        None | Some(Value::Null) => {
            out.push(FieldViolation::new(field, "field required"));
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(x) if x.is_finite() => Some(x),
        _ => {
            out.push(FieldViolation::new(field, "must be a number"));
            None
        }
    }
}

fn percentage(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) -> Option<f64> {
    let x = number(obj, field, out)?;
    if !(0.0..=100.0).contains(&x) {
        out.push(FieldViolation::new(field, "must be between 0 and 100"));
        return None;
    }
    Some(x)
}

fn non_negative_float(
    obj: &Map<String, Value>,
    field: &str,
    out: &mut Vec<FieldViolation>,
) -> Option<f64> {
    let x = number(obj, field, out)?;
    if x < 0.0 {
        out.push(FieldViolation::new(field, "must be greater than or equal to 0"));
        return None;
    }
    Some(x)
}

fn integer(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) -> Option<f64> {
    let x = number(obj, field, out)?;
    if x.fract() != 0.0 {
        out.push(FieldViolation::new(field, "must be a whole number"));
        return None;
    }
    Some(x)
}

fn count(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) -> Option<u32> {
    let x = integer(obj, field, out)?;
    if x < 0.0 {
        out.push(FieldViolation::new(field, "must be greater than or equal to 0"));
        return None;
    }
    if x > f64::from(u32::MAX) {
        out.push(FieldViolation::new(field, "is too large"));
        return None;
    }
    Some(x as u32)
}

fn flag(obj: &Map<String, Value>, field: &str, out: &mut Vec<FieldViolation>) -> Option<u8> {
    let x = integer(obj, field, out)?;
    if x == 0.0 {
        Some(0)
    } else if x == 1.0 {
        Some(1)
    } else {
        out.push(FieldViolation::new(field, "must be 0 or 1"));
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
