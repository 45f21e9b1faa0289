//! # Rule Evaluation
//!
//! Evaluates a single [`ValidationRule`] against a value that has already
//! passed its type check. A rule that does not apply to the value's JSON
//! type is skipped rather than failed: a `Range` on a string property is a
//! no-op, not a violation.

use regex::Regex;
use serde_json::Value;

use crate::model::ValidationRule;

/// Result of evaluating one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleOutcome {
    Satisfied,
    Violated,
    /// The rule does not apply to this JSON type.
    Skipped,
    /// The rule itself is malformed (only possible for schemas that were
    /// never registered, since registration rejects bad patterns).
    Malformed(String),
}

/// Compile a pattern rule's regular expression.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)
}

/// Evaluate `rule` against `value`.
pub fn evaluate(rule: &ValidationRule, value: &Value) -> RuleOutcome {
    match rule {
        ValidationRule::Pattern { pattern, .. } => {
            let Some(s) = value.as_str() else {
                return RuleOutcome::Skipped;
            };
            match compile_pattern(pattern) {
                Ok(re) => verdict(re.is_match(s)),
                Err(e) => RuleOutcome::Malformed(format!("pattern {pattern} does not compile: {e}")),
            }
        }
        ValidationRule::Range { min, max, .. } => {
            let Some(n) = value.as_f64() else {
                return RuleOutcome::Skipped;
            };
            verdict(min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi))
        }
        ValidationRule::Length { min, max, .. } => {
            let len = match value {
                Value::String(s) => s.chars().count(),
                Value::Array(a) => a.len(),
                Value::Object(o) => o.len(),
                _ => return RuleOutcome::Skipped,
            };
            verdict(min.map_or(true, |lo| len >= lo) && max.map_or(true, |hi| len <= hi))
        }
        ValidationRule::AllowedValues { values, .. } => verdict(values.contains(value)),
    }
}

fn verdict(ok: bool) -> RuleOutcome {
    if ok {
        RuleOutcome::Satisfied
    } else {
        RuleOutcome::Violated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pattern_matches_strings_only() {
        let rule = ValidationRule::pattern("^[a-z0-9]+$");
        assert_eq!(evaluate(&rule, &json!("westus2")), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!("West US")), RuleOutcome::Violated);
        assert_eq!(evaluate(&rule, &json!(5)), RuleOutcome::Skipped);
    }

    #[test]
    fn malformed_pattern_is_reported() {
        let rule = ValidationRule::pattern("([a-z");
        assert!(matches!(evaluate(&rule, &json!("a")), RuleOutcome::Malformed(_)));
    }

    #[test]
    fn range_is_inclusive() {
        let rule = ValidationRule::range(Some(1.0), Some(10.0));
        assert_eq!(evaluate(&rule, &json!(1)), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!(10.0)), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!(10.5)), RuleOutcome::Violated);
        assert_eq!(evaluate(&rule, &json!(0)), RuleOutcome::Violated);
        assert_eq!(evaluate(&rule, &json!("5")), RuleOutcome::Skipped);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let rule = ValidationRule::length(None, Some(3));
        assert_eq!(evaluate(&rule, &json!("äöü")), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!("abcd")), RuleOutcome::Violated);
        assert_eq!(evaluate(&rule, &json!([1, 2, 3, 4])), RuleOutcome::Violated);
        assert_eq!(evaluate(&rule, &json!({"a": 1})), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!(true)), RuleOutcome::Skipped);
    }

    #[test]
    fn allowed_values_compares_structurally() {
        let rule = ValidationRule::allowed_values([json!("Hot"), json!("Cool")]);
        assert_eq!(evaluate(&rule, &json!("Cool")), RuleOutcome::Satisfied);
        assert_eq!(evaluate(&rule, &json!("Archive")), RuleOutcome::Violated);
    }
}
