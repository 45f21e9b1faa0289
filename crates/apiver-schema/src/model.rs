//! # Schema Model
//!
//! The property definitions that describe one (resource type, version) pair.
//!
//! `PropertyType` is a recursive tagged union: objects carry their nested
//! schema, arrays carry their item type. Validation and transformation
//! match on it exhaustively, so adding a variant forces every walker to
//! handle it.
//!
//! ## Serialized Form
//!
//! Schemas load from YAML or JSON catalogs:
//!
//! ```yaml
//! properties:
//!   location:
//!     type: { scalar: string }
//!     required: true
//!     rules:
//!       - rule: pattern
//!         pattern: "^[a-z0-9]+$"
//!   accountType:
//!     type: { enum: [Standard_LRS, Premium_LRS] }
//!     renamed_in:
//!       "2024-01-01": sku.name
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use apiver_core::ApiVersion;

// ─── ApiSchema ───────────────────────────────────────────────────────

/// Property definitions for one object level, keyed by logical name.
///
/// Keys iterate in sorted order, which is the order used for violation
/// reports and for wire body construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSchema {
    /// Declared properties.
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDefinition>,
    /// When true, undeclared properties are accepted and passed through.
    #[serde(default)]
    pub extensible: bool,
}

impl ApiSchema {
    /// An empty, closed schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a property definition.
    pub fn property(mut self, name: impl Into<String>, def: PropertyDefinition) -> Self {
        self.properties.insert(name.into(), def);
        self
    }

    /// Accept and pass through undeclared properties.
    pub fn extensible(mut self) -> Self {
        self.extensible = true;
        self
    }

    /// Look up a property definition by logical name.
    pub fn get(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.get(name)
    }
}

// ─── PropertyType ────────────────────────────────────────────────────

/// Primitive JSON kinds a scalar property may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
    String,
    /// JSON integers only.
    Integer,
    /// Any JSON number.
    Number,
    Boolean,
    /// Any non-null value.
    Any,
}

impl ScalarKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Any => "any",
        }
    }

    /// Whether a (non-null) JSON value is of this kind.
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Any => !value.is_null(),
        }
    }
}

/// The declared type of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    /// A primitive value.
    Scalar(ScalarKind),
    /// A nested object with its own schema.
    Object(ApiSchema),
    /// A homogeneous array.
    Array(Box<PropertyType>),
    /// A string drawn from a closed set.
    Enum(Vec<String>),
}

impl PropertyType {
    /// Human-readable type name used in `TypeMismatch` reports.
    pub fn type_name(&self) -> String {
        match self {
            Self::Scalar(kind) => kind.as_str().to_string(),
            Self::Object(_) => "object".to_string(),
            Self::Array(items) => format!("array<{}>", items.type_name()),
            Self::Enum(values) => format!("enum[{}]", values.join(", ")),
        }
    }

    /// Whether a (non-null) JSON value has the outer shape of this type.
    ///
    /// Object and array contents are not inspected.
    pub fn shape_matches(&self, value: &Value) -> bool {
        match self {
            Self::Scalar(kind) => kind.accepts(value),
            Self::Object(_) => value.is_object(),
            Self::Array(_) => value.is_array(),
            Self::Enum(values) => value
                .as_str()
                .map(|s| values.iter().any(|v| v == s))
                .unwrap_or(false),
        }
    }
}

/// The JSON type name of a value, for `TypeMismatch` reports.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ─── ValidationRule ──────────────────────────────────────────────────

/// A constraint evaluated after a value passes its type check.
///
/// Each rule carries an optional human-readable description; when absent
/// [`ValidationRule::describe`] generates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ValidationRule {
    /// String must match a regular expression.
    Pattern {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Number must lie within inclusive bounds.
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// String length (in characters), array length, or object entry count
    /// must lie within inclusive bounds.
    Length {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// Value must equal one of a fixed set.
    AllowedValues {
        values: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl ValidationRule {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            description: None,
        }
    }

    pub fn range(min: Option<f64>, max: Option<f64>) -> Self {
        Self::Range {
            min,
            max,
            description: None,
        }
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        Self::Length {
            min,
            max,
            description: None,
        }
    }

    pub fn allowed_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self::AllowedValues {
            values: values.into_iter().collect(),
            description: None,
        }
    }

    /// Replace the generated failure description.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        let slot = match &mut self {
            Self::Pattern { description, .. }
            | Self::Range { description, .. }
            | Self::Length { description, .. }
            | Self::AllowedValues { description, .. } => description,
        };
        *slot = Some(text.into());
        self
    }

    /// The short rule name (`pattern`, `range`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pattern { .. } => "pattern",
            Self::Range { .. } => "range",
            Self::Length { .. } => "length",
            Self::AllowedValues { .. } => "allowed_values",
        }
    }

    /// Human-readable failure description.
    pub fn describe(&self) -> String {
        match self {
            Self::Pattern {
                description: Some(d),
                ..
            }
            | Self::Range {
                description: Some(d),
                ..
            }
            | Self::Length {
                description: Some(d),
                ..
            }
            | Self::AllowedValues {
                description: Some(d),
                ..
            } => d.clone(),
            Self::Pattern { pattern, .. } => format!("must match pattern {pattern}"),
            Self::Range { min, max, .. } => format!("must be {}", bounds_text(*min, *max)),
            Self::Length { min, max, .. } => {
                format!("length must be {}", bounds_text(*min, *max))
            }
            Self::AllowedValues { values, .. } => {
                let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                format!("must be one of [{}]", rendered.join(", "))
            }
        }
    }
}

fn bounds_text<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("between {lo} and {hi}"),
        (Some(lo), None) => format!("at least {lo}"),
        (None, Some(hi)) => format!("at most {hi}"),
        (None, None) => "unbounded".to_string(),
    }
}

// ─── PropertyDefinition ──────────────────────────────────────────────

/// One declared property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyDefinition {
    /// Declared type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    /// Whether the caller must supply a non-null value.
    #[serde(default)]
    pub required: bool,
    /// Value filled in by `transform` when the caller omits the property.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Constraints evaluated after the type check passes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<ValidationRule>,
    /// Wire path used when no version-specific rename applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,
    /// Version-specific wire paths (dotted, relative to the enclosing object).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub renamed_in: BTreeMap<ApiVersion, String>,
    /// Use raises a non-fatal warning.
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyDefinition {
    /// An optional property of the given type with no rules or renames.
    pub fn of(property_type: PropertyType) -> Self {
        Self {
            property_type,
            required: false,
            default: None,
            rules: Vec::new(),
            wire_name: None,
            renamed_in: BTreeMap::new(),
            deprecated: false,
            description: None,
        }
    }

    pub fn string() -> Self {
        Self::of(PropertyType::Scalar(ScalarKind::String))
    }

    pub fn integer() -> Self {
        Self::of(PropertyType::Scalar(ScalarKind::Integer))
    }

    pub fn number() -> Self {
        Self::of(PropertyType::Scalar(ScalarKind::Number))
    }

    pub fn boolean() -> Self {
        Self::of(PropertyType::Scalar(ScalarKind::Boolean))
    }

    pub fn any() -> Self {
        Self::of(PropertyType::Scalar(ScalarKind::Any))
    }

    pub fn object(schema: ApiSchema) -> Self {
        Self::of(PropertyType::Object(schema))
    }

    pub fn array(items: PropertyType) -> Self {
        Self::of(PropertyType::Array(Box::new(items)))
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::of(PropertyType::Enum(values.into_iter().map(Into::into).collect()))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_rule(mut self, rule: ValidationRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn wire_name(mut self, wire: impl Into<String>) -> Self {
        self.wire_name = Some(wire.into());
        self
    }

    pub fn renamed_in(mut self, version: ApiVersion, wire: impl Into<String>) -> Self {
        self.renamed_in.insert(version, wire.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// The wire path for this property under `version`, relative to the
    /// enclosing object: the version-specific rename, else `wire_name`,
    /// else the logical name.
    pub fn wire_path_for<'a>(&'a self, logical: &'a str, version: &ApiVersion) -> &'a str {
        self.renamed_in
            .get(version)
            .or(self.wire_name.as_ref())
            .map(String::as_str)
            .unwrap_or(logical)
    }
}
