//! # Schema Well-Formedness
//!
//! Static checks run when a version set is registered. A schema that passes
//! them can be used by `validate` and `transform` without either hitting a
//! malformed rule or a wire collision.

use std::collections::BTreeSet;

use thiserror::Error;

use apiver_core::{ApiVersion, PropertyPath};

use crate::model::{ApiSchema, PropertyDefinition, PropertyType, ValidationRule};
use crate::rename::join;
use crate::rules::compile_pattern;
use crate::validate::validate_property;

/// One structural problem in a schema.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaDefect {
    #[error("property name {name:?} at `{path}` is empty or contains '.', '[' or ']'")]
    InvalidPropertyName { path: String, name: String },

    #[error("wire path {wire:?} for `{path}` has an empty segment")]
    EmptyWireSegment { path: String, wire: String },

    #[error("wire path {wire:?} for `{path}` collides with {other:?} for `{other_path}`")]
    WireCollision {
        path: String,
        wire: String,
        other_path: String,
        other: String,
    },

    #[error("`{path}` declares a rename for version {version}, which is not in the version set")]
    UnknownRenameVersion { path: String, version: ApiVersion },

    #[error("enum at `{path}` has no values")]
    EmptyEnum { path: String },

    #[error("pattern {pattern:?} at `{path}` does not compile: {reason}")]
    InvalidPattern {
        path: String,
        pattern: String,
        reason: String,
    },

    #[error("{rule} rule at `{path}` has min greater than max")]
    InvalidBounds { path: String, rule: &'static str },

    #[error("default for `{path}` does not satisfy its definition: {reason}")]
    InvalidDefault { path: String, reason: String },
}

/// Check `schema` as registered for `version` within a set of `known` versions.
///
/// Returns every defect found; an empty list means the schema is well-formed.
pub fn check_well_formed(
    schema: &ApiSchema,
    version: &ApiVersion,
    known: &BTreeSet<ApiVersion>,
) -> Vec<SchemaDefect> {
    let mut defects = Vec::new();
    check_object(schema, version, known, "", &mut defects);
    defects
}

fn check_object(
    schema: &ApiSchema,
    version: &ApiVersion,
    known: &BTreeSet<ApiVersion>,
    prefix: &str,
    defects: &mut Vec<SchemaDefect>,
) {
    let mut placed: Vec<(String, &str)> = Vec::with_capacity(schema.properties.len());

    for (name, def) in &schema.properties {
        let path = join(prefix, name);
        if name.is_empty() || name.contains(['.', '[', ']']) {
            defects.push(SchemaDefect::InvalidPropertyName {
                path: path.clone(),
                name: name.clone(),
            });
        }

        for renamed in def.renamed_in.keys() {
            if !known.contains(renamed) {
                defects.push(SchemaDefect::UnknownRenameVersion {
                    path: path.clone(),
                    version: renamed.clone(),
                });
            }
        }

        let wire = def.wire_path_for(name, version);
        if wire.split('.').any(str::is_empty) {
            defects.push(SchemaDefect::EmptyWireSegment {
                path: path.clone(),
                wire: wire.to_string(),
            });
        } else if let Some((other_path, other)) = placed
            .iter()
            .find(|(_, other)| wire_overlaps(wire, other))
        {
            defects.push(SchemaDefect::WireCollision {
                path: path.clone(),
                wire: wire.to_string(),
                other_path: other_path.clone(),
                other: other.to_string(),
            });
        } else {
            placed.push((path.clone(), wire));
        }

        check_rules(def, &path, defects);
        check_default(def, &path, defects);
        check_type(&def.property_type, version, known, &path, defects);
    }
}

fn check_type(
    ty: &PropertyType,
    version: &ApiVersion,
    known: &BTreeSet<ApiVersion>,
    path: &str,
    defects: &mut Vec<SchemaDefect>,
) {
    match ty {
        PropertyType::Object(nested) => check_object(nested, version, known, path, defects),
        PropertyType::Array(items) => check_type(items, version, known, &format!("{path}[]"), defects),
        PropertyType::Enum(values) if values.is_empty() => {
            defects.push(SchemaDefect::EmptyEnum {
                path: path.to_string(),
            });
        }
        PropertyType::Enum(_) | PropertyType::Scalar(_) => {}
    }
}

fn check_rules(def: &PropertyDefinition, path: &str, defects: &mut Vec<SchemaDefect>) {
    for rule in &def.rules {
        match rule {
            ValidationRule::Pattern { pattern, .. } => {
                if let Err(e) = compile_pattern(pattern) {
                    defects.push(SchemaDefect::InvalidPattern {
                        path: path.to_string(),
                        pattern: pattern.clone(),
                        reason: e.to_string(),
                    });
                }
            }
            ValidationRule::Range {
                min: Some(lo),
                max: Some(hi),
                ..
            } if lo > hi => defects.push(SchemaDefect::InvalidBounds {
                path: path.to_string(),
                rule: rule.name(),
            }),
            ValidationRule::Length {
                min: Some(lo),
                max: Some(hi),
                ..
            } if lo > hi => defects.push(SchemaDefect::InvalidBounds {
                path: path.to_string(),
                rule: rule.name(),
            }),
            _ => {}
        }
    }
}

fn check_default(def: &PropertyDefinition, path: &str, defects: &mut Vec<SchemaDefect>) {
    let Some(default) = &def.default else {
        return;
    };
    let as_path = PropertyPath::root().child(path);
    if let Err(failure) = validate_property(default, def, &as_path) {
        defects.push(SchemaDefect::InvalidDefault {
            path: path.to_string(),
            reason: failure
                .violations()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        });
    }
}

/// Two wire paths overlap when equal or when one is a dotted prefix of the
/// other (`sku` and `sku.name`).
fn wire_overlaps(a: &str, b: &str) -> bool {
    let prefix_of = |short: &str, long: &str| {
        long.len() > short.len()
            && long.starts_with(short)
            && long.as_bytes()[short.len()] == b'.'
    };
    a == b || prefix_of(a, b) || prefix_of(b, a)
}
