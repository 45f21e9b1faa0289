//! # Property Validation
//!
//! Checks a caller-supplied property bag against an [`ApiSchema`] and
//! reports every violation, not just the first.
//!
//! ## Order
//!
//! Violations are reported in a deterministic order: declared properties in
//! schema key order (depth first), then undeclared properties in key order.
//! The same input always yields the same report.
//!
//! ## Null
//!
//! A JSON `null` is treated exactly like an absent property: it triggers
//! `MissingRequiredProperty` when required and is otherwise ignored.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use apiver_core::PropertyPath;

use crate::model::{json_type_name, ApiSchema, PropertyDefinition, PropertyType};
use crate::rules::{evaluate, RuleOutcome};

// ─── Violations ──────────────────────────────────────────────────────

/// A single fatal validation failure, naming the offending property.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// A required property is absent (or null).
    #[error("missing required property `{path}`")]
    MissingRequiredProperty {
        path: PropertyPath,
    },

    /// A property's value does not have its declared type.
    #[error("type mismatch at `{path}`: expected {expected}, got {actual}")]
    TypeMismatch {
        path: PropertyPath,
        expected: String,
        actual: String,
    },

    /// A validation rule rejected the value.
    #[error("validation rule violated at `{path}`: {description}")]
    ValidationRuleViolation {
        path: PropertyPath,
        description: String,
    },

    /// The property is not declared and the schema is closed.
    #[error("unknown property `{path}`")]
    UnknownProperty {
        path: PropertyPath,
    },
}

impl Violation {
    /// The path of the offending property.
    pub fn path(&self) -> &PropertyPath {
        match self {
            Self::MissingRequiredProperty { path }
            | Self::TypeMismatch { path, .. }
            | Self::ValidationRuleViolation { path, .. }
            | Self::UnknownProperty { path } => path,
        }
    }
}

/// A non-fatal observation made during validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// A property marked deprecated was supplied.
    DeprecatedProperty { path: PropertyPath },
    /// An undeclared property was accepted by an extensible schema.
    ExtensionProperty { path: PropertyPath },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeprecatedProperty { path } => write!(f, "property `{path}` is deprecated"),
            Self::ExtensionProperty { path } => {
                write!(f, "property `{path}` is not declared; passed through unvalidated")
            }
        }
    }
}

/// Successful validation, possibly with warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub warnings: Vec<ValidationWarning>,
}

/// Failed validation: a non-empty, ordered list of violations.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} validation violation(s):\n{}", .violations.len(), render(.violations))]
pub struct ValidationFailure {
    violations: Vec<Violation>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationFailure {
    /// The violations, in report order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Warnings gathered alongside the violations.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// The first violation. Always present.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Walker ──────────────────────────────────────────────────────────

#[derive(Default)]
struct Collector {
    violations: Vec<Violation>,
    warnings: Vec<ValidationWarning>,
}

/// Validate `properties` (which must be a JSON object) against `schema`.
pub fn validate(properties: &Value, schema: &ApiSchema) -> Result<ValidationReport, ValidationFailure> {
    let mut out = Collector::default();
    match properties {
        Value::Object(map) => validate_object(map, schema, &PropertyPath::root(), &mut out),
        other => out.violations.push(Violation::TypeMismatch {
            path: PropertyPath::root(),
            expected: "object".to_string(),
            actual: json_type_name(other).to_string(),
        }),
    }
    finish(out)
}

/// Validate one value against a single property definition.
///
/// Used by schema well-formedness checks to confirm that declared defaults
/// satisfy their own definitions.
pub fn validate_property(
    value: &Value,
    def: &PropertyDefinition,
    path: &PropertyPath,
) -> Result<ValidationReport, ValidationFailure> {
    let mut out = Collector::default();
    if value.is_null() {
        out.violations.push(Violation::TypeMismatch {
            path: path.clone(),
            expected: def.property_type.type_name(),
            actual: "null".to_string(),
        });
    } else {
        validate_value(value, def, path, &mut out);
    }
    finish(out)
}

fn finish(out: Collector) -> Result<ValidationReport, ValidationFailure> {
    if out.violations.is_empty() {
        Ok(ValidationReport {
            warnings: out.warnings,
        })
    } else {
        Err(ValidationFailure {
            violations: out.violations,
            warnings: out.warnings,
        })
    }
}

fn validate_object(
    map: &Map<String, Value>,
    schema: &ApiSchema,
    path: &PropertyPath,
    out: &mut Collector,
) {
    for (name, def) in &schema.properties {
        let child = path.child(name);
        match map.get(name) {
            None | Some(Value::Null) => {
                if def.required {
                    out.violations
                        .push(Violation::MissingRequiredProperty { path: child });
                }
            }
            Some(value) => validate_value(value, def, &child, out),
        }
    }

    let mut undeclared: Vec<&String> = map
        .iter()
        .filter(|(key, value)| !value.is_null() && !schema.properties.contains_key(*key))
        .map(|(key, _)| key)
        .collect();
    undeclared.sort();
    for key in undeclared {
        let child = path.child(key);
        if schema.extensible {
            out.warnings
                .push(ValidationWarning::ExtensionProperty { path: child });
        } else {
            out.violations.push(Violation::UnknownProperty { path: child });
        }
    }
}

fn validate_value(value: &Value, def: &PropertyDefinition, path: &PropertyPath, out: &mut Collector) {
    if def.deprecated {
        out.warnings.push(ValidationWarning::DeprecatedProperty { path: path.clone() });
    }
    if !validate_type(value, &def.property_type, path, out) {
        return;
    }
    for rule in &def.rules {
        let description = match evaluate(rule, value) {
            RuleOutcome::Satisfied | RuleOutcome::Skipped => continue,
            RuleOutcome::Violated => rule.describe(),
            RuleOutcome::Malformed(reason) => reason,
        };
        out.violations.push(Violation::ValidationRuleViolation {
            path: path.clone(),
            description,
        });
    }
}

/// Check `value` against `ty`, recursing into objects and arrays.
///
/// Returns whether the outer shape matched; rules only run when it did.
fn validate_type(value: &Value, ty: &PropertyType, path: &PropertyPath, out: &mut Collector) -> bool {
    if !ty.shape_matches(value) {
        out.violations.push(Violation::TypeMismatch {
            path: path.clone(),
            expected: ty.type_name(),
            actual: json_type_name(value).to_string(),
        });
        return false;
    }
    match (ty, value) {
        (PropertyType::Object(schema), Value::Object(map)) => {
            validate_object(map, schema, path, out);
        }
        (PropertyType::Array(items), Value::Array(elements)) => {
            for (i, element) in elements.iter().enumerate() {
                validate_type(element, items, &path.index(i), out);
            }
        }
        _ => {}
    }
    true
}
