//! # Wire Transformation
//!
//! Rewrites a validated, version-agnostic property bag into the wire body
//! for one API version.
//!
//! ## Contract
//!
//! - Each declared property is emitted at its wire path for the version,
//!   looked up in the [`RenameTable`]. Dotted wire paths (`sku.name`) are
//!   nested into intermediate objects.
//! - Omitted optional properties with a declared default receive the
//!   default, itself transformed.
//! - Nested objects and array items are rewritten recursively.
//! - Extensible schemas pass undeclared properties through, unless the key
//!   is already occupied by a declared property's wire output.
//! - The output depends only on `(properties, schema, version)`.
//!
//! `transform` is total over input accepted by [`crate::validate`] against
//! the same well-formed schema. The errors below are reachable only for
//! input that skipped validation.

use serde_json::{Map, Value};
use thiserror::Error;

use apiver_core::{ApiVersion, PropertyPath};

use crate::model::{json_type_name, ApiSchema, PropertyType};
use crate::rename::{join, RenameTable};

/// Transformation failure on input that was never validated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// A value does not have the object/array shape its definition requires.
    #[error("cannot transform `{path}`: expected {expected}, got {actual}")]
    ShapeMismatch {
        path: PropertyPath,
        expected: String,
        actual: String,
    },

    /// Two properties target the same wire location.
    #[error("wire path `{wire_path}` for `{path}` collides with an existing wire field")]
    WireCollision {
        path: PropertyPath,
        wire_path: String,
    },
}

/// Transform `properties` into the wire body for `version`.
pub fn transform(
    properties: &Value,
    schema: &ApiSchema,
    version: &ApiVersion,
) -> Result<Value, TransformError> {
    let table = RenameTable::build(schema, version);
    let root = PropertyPath::root();
    let map = properties.as_object().ok_or_else(|| TransformError::ShapeMismatch {
        path: root.clone(),
        expected: "object".to_string(),
        actual: json_type_name(properties).to_string(),
    })?;
    transform_object(map, schema, &table, "", &root).map(Value::Object)
}

fn transform_object(
    map: &Map<String, Value>,
    schema: &ApiSchema,
    table: &RenameTable,
    logical: &str,
    path: &PropertyPath,
) -> Result<Map<String, Value>, TransformError> {
    let mut out = Map::new();

    for (name, def) in &schema.properties {
        let source = match map.get(name) {
            Some(v) if !v.is_null() => v,
            _ => match &def.default {
                Some(d) if !d.is_null() => d,
                _ => continue,
            },
        };
        let logical_path = join(logical, name);
        let child = path.child(name);
        let value = transform_value(source, &def.property_type, table, &logical_path, &child)?;

        let segments: Vec<&str> = match table.get(&logical_path) {
            Some(entry) => entry.segments().collect(),
            None => vec![name.as_str()],
        };
        insert_at(&mut out, &segments, value, &child)?;
    }

    if schema.extensible {
        for (key, value) in map {
            if value.is_null() || schema.properties.contains_key(key) || out.contains_key(key) {
                continue;
            }
            out.insert(key.clone(), value.clone());
        }
    }

    Ok(out)
}

fn transform_value(
    value: &Value,
    ty: &PropertyType,
    table: &RenameTable,
    logical: &str,
    path: &PropertyPath,
) -> Result<Value, TransformError> {
    match ty {
        PropertyType::Object(schema) => {
            let map = value.as_object().ok_or_else(|| shape_mismatch(ty, value, path))?;
            transform_object(map, schema, table, logical, path).map(Value::Object)
        }
        PropertyType::Array(items) => {
            let elements = value.as_array().ok_or_else(|| shape_mismatch(ty, value, path))?;
            let item_logical = format!("{logical}[]");
            elements
                .iter()
                .enumerate()
                .map(|(i, element)| transform_value(element, items, table, &item_logical, &path.index(i)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        PropertyType::Scalar(_) | PropertyType::Enum(_) => Ok(value.clone()),
    }
}

fn shape_mismatch(ty: &PropertyType, value: &Value, path: &PropertyPath) -> TransformError {
    TransformError::ShapeMismatch {
        path: path.clone(),
        expected: ty.type_name(),
        actual: json_type_name(value).to_string(),
    }
}

/// Place `value` at the dotted `segments` under `out`, creating
/// intermediate objects as needed.
fn insert_at(
    out: &mut Map<String, Value>,
    segments: &[&str],
    value: Value,
    path: &PropertyPath,
) -> Result<(), TransformError> {
    let collision = || TransformError::WireCollision {
        path: path.clone(),
        wire_path: segments.join("."),
    };
    let Some((leaf, parents)) = segments.split_last() else {
        return Err(collision());
    };
    let mut cursor = out;
    for segment in parents {
        let slot = cursor
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        cursor = match slot {
            Value::Object(inner) => inner,
            _ => return Err(collision()),
        };
    }
    if cursor.contains_key(*leaf) {
        return Err(collision());
    }
    cursor.insert(leaf.to_string(), value);
    Ok(())
}
