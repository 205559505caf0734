// =============================================================================
// Explanation Generator — fixed threshold rules → one readable sentence
// =============================================================================
//
// Presentation only: reads the raw indicators and the prediction a model
// already made, never the probability, and never changes the prediction.
//
// Trend-based rules, in priority order:
//   midterm_score < 70, quiz_score < 70, study_hours < 10, attendance < 75
// Every triggered factor is named (all-matches), in that order.
//
// Rule-based rules:
//   past_failures > 0, internet_access == 0
// =============================================================================

use crate::features::RawFeatures;
use crate::types::ModelKind;

pub const LOW_MIDTERM_BELOW: f64 = 70.0;
pub const LOW_QUIZ_BELOW: f64 = 70.0;
pub const LOW_STUDY_HOURS_BELOW: f64 = 10.0;
pub const LOW_ATTENDANCE_BELOW: f64 = 75.0;

/// Explain `prediction` for the given model.
pub fn explain(raw: &RawFeatures, kind: ModelKind, prediction: u8) -> String {
    match kind {
        ModelKind::TrendBased => explain_trend(raw, prediction),
        ModelKind::RuleBased => explain_rule(raw, prediction),
    }
}

/// Triggered trend factors, in priority order.
pub fn trend_factors(raw: &RawFeatures) -> Vec<&'static str> {
    let checks = [
        (raw.midterm_score < LOW_MIDTERM_BELOW, "low midterm score"),
        (raw.quiz_score < LOW_QUIZ_BELOW, "low quiz score"),
        (raw.study_hours < LOW_STUDY_HOURS_BELOW, "low study hours"),
        (raw.attendance < LOW_ATTENDANCE_BELOW, "low attendance"),
    ];
    checks
        .into_iter()
        .filter_map(|(hit, label)| hit.then_some(label))
        .collect()
}

/// Triggered rule conditions.
pub fn rule_triggers(raw: &RawFeatures) -> Vec<String> {
    let mut triggers = Vec::new();
    match raw.past_failures {
        0 => {}
        1 => triggers.push("1 past failure".to_string()),
        n => triggers.push(format!("{n} past failures")),
    }
    if !raw.has_internet_access() {
        triggers.push("no internet access".to_string());
    }
    triggers
}

fn verdict(prediction: u8) -> &'static str {
    if prediction == 1 {
        "at risk"
    } else {
        "not at risk"
    }
}

fn explain_trend(raw: &RawFeatures, prediction: u8) -> String {
    let factors = trend_factors(raw);
    let v = verdict(prediction);
    match (prediction == 1, factors.is_empty()) {
        (true, false) => format!(
            "The model predicted the student is {v} because of {}.",
            join_list(&factors)
        ),
        (true, true) => format!(
            "The model predicted the student is {v} based on overall academic performance indicators."
        ),
        (false, true) => format!(
            "The model predicted the student is {v} based on normal academic performance indicators."
        ),
        (false, false) => format!(
            "The model predicted the student is {v} based on normal academic performance indicators, despite {}.",
            join_list(&factors)
        ),
    }
}

fn explain_rule(raw: &RawFeatures, prediction: u8) -> String {
    let triggers = rule_triggers(raw);
    let v = verdict(prediction);
    match (prediction == 1, triggers.is_empty()) {
        (true, false) => format!(
            "The model predicted the student is {v} because of {}.",
            join_list(&triggers)
        ),
        (false, true) => format!(
            "The model predicted the student is {v} because of no past failures and internet access available."
        ),
        (false, false) => format!(
            "The model predicted the student is {v} despite {}.",
            join_list(&triggers)
        ),
        (true, true) => format!(
            "The model predicted the student is {v} based on its decision path, with no past failures and internet access available."
        ),
    }
}

/// "a", "a and b", "a, b, and c".
fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} and {}", a.as_ref(), b.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(AsRef::as_ref).collect();
            format!("{}, and {}", head.join(", "), last.as_ref())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn healthy() -> RawFeatures {
        RawFeatures {
            attendance: 85.5,
            study_hours: 10.0,
            assignments_completed: 8,
            quiz_score: 75.0,
            midterm_score: 80.0,
            internet_access: 1,
            past_failures: 0,
        }
    }

    #[test]
    fn join_list_shapes() {
        assert_eq!(join_list::<&str>(&[]), "");
        assert_eq!(join_list(&["a"]), "a");
        assert_eq!(join_list(&["a", "b"]), "a and b");
        assert_eq!(join_list(&["a", "b", "c", "d"]), "a, b, c, and d");
    }

    #[test]
    fn trend_names_all_factors_in_priority_order() {
        let raw = RawFeatures {
            attendance: 40.0,
            study_hours: 2.0,
            quiz_score: 45.0,
            midterm_score: 40.0,
            ..healthy()
        };
        assert_eq!(
            explain(&raw, ModelKind::TrendBased, 1),
            "The model predicted the student is at risk because of low midterm score, \
             low quiz score, low study hours, and low attendance."
        );
    }

    #[test]
    fn trend_thresholds_are_strict() {
        let raw = RawFeatures {
            attendance: 75.0,
            study_hours: 10.0,
            quiz_score: 70.0,
            midterm_score: 70.0,
            ..healthy()
        };
        assert!(trend_factors(&raw).is_empty());

        let raw = RawFeatures {
            quiz_score: 69.99,
            ..raw
        };
        assert_eq!(trend_factors(&raw), vec!["low quiz score"]);
    }

    #[test]
    fn trend_not_at_risk_is_generic() {
        assert_eq!(
            explain(&healthy(), ModelKind::TrendBased, 0),
            "The model predicted the student is not at risk based on normal academic performance indicators."
        );
    }

    #[test]
    fn trend_not_at_risk_still_mentions_factors() {
        let raw = RawFeatures {
            study_hours: 4.0,
            ..healthy()
        };
        let text = explain(&raw, ModelKind::TrendBased, 0);
        assert!(text.contains("normal academic performance indicators"));
        assert!(text.ends_with("despite low study hours."));
    }

    #[test]
    fn trend_at_risk_without_factors() {
        assert_eq!(
            explain(&healthy(), ModelKind::TrendBased, 1),
            "The model predicted the student is at risk based on overall academic performance indicators."
        );
    }

    #[test]
    fn rule_neither_trigger_not_at_risk() {
        assert_eq!(
            explain(&healthy(), ModelKind::RuleBased, 0),
            "The model predicted the student is not at risk because of no past failures and internet access available."
        );
    }

    #[test]
    fn rule_names_both_triggers() {
        let raw = RawFeatures {
            past_failures: 3,
            internet_access: 0,
            ..healthy()
        };
        assert_eq!(
            explain(&raw, ModelKind::RuleBased, 1),
            "The model predicted the student is at risk because of 3 past failures and no internet access."
        );
    }

    #[test]
    fn rule_singular_failure() {
        let raw = RawFeatures {
            past_failures: 1,
            ..healthy()
        };
        assert_eq!(rule_triggers(&raw), vec!["1 past failure"]);
        assert_eq!(
            explain(&raw, ModelKind::RuleBased, 0),
            "The model predicted the student is not at risk despite 1 past failure."
        );
    }

    #[test]
    fn rule_text_changes_with_trigger() {
        let base = healthy();
        let toggled = RawFeatures {
            past_failures: 1,
            ..base
        };
        for prediction in [0, 1] {
            assert_ne!(
                explain(&base, ModelKind::RuleBased, prediction),
                explain(&toggled, ModelKind::RuleBased, prediction)
            );
        }
    }

    #[test]
    fn rule_text_ignores_non_rule_fields() {
        let base = healthy();
        let other = RawFeatures {
            midterm_score: 10.0,
            attendance: 5.0,
            ..base
        };
        assert_eq!(
            explain(&base, ModelKind::RuleBased, 0),
            explain(&other, ModelKind::RuleBased, 0)
        );
    }
}
