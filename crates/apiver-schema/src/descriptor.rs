//! # Version Descriptors
//!
//! One descriptor per (resource type, API version): the schema, the
//! version's support level, and any breaking changes the provider documents
//! for it.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use apiver_core::{ApiVersion, SupportLevel};

use crate::model::ApiSchema;

/// A dated API revision and its schema.
///
/// The schema is held behind an `Arc`: once registered it is immutable and
/// shared by every construction that resolves to this version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionDescriptor {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
    pub schema: Arc<ApiSchema>,
    /// Changes introduced by this version relative to its predecessor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breaking_changes: Vec<BreakingChange>,
    /// First day on which the provider no longer accepts this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset_date: Option<NaiveDate>,
}

impl VersionDescriptor {
    pub fn new(version: ApiVersion, support_level: SupportLevel, schema: ApiSchema) -> Self {
        Self {
            version,
            support_level,
            schema: Arc::new(schema),
            breaking_changes: Vec::new(),
            sunset_date: None,
        }
    }

    pub fn with_sunset_date(mut self, date: NaiveDate) -> Self {
        self.sunset_date = Some(date);
        self
    }

    /// Document a breaking change introduced by this version.
    pub fn with_breaking_change(mut self, change: BreakingChange) -> Self {
        self.breaking_changes.push(change);
        self
    }
}

/// Classification of an incompatible change between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakingChangeType {
    PropertyRemoved,
    PropertyRenamed,
    PropertyTypeChanged,
    /// A property became required (or a new required property appeared).
    PropertyRequired,
    SchemaRestructured,
}

impl BreakingChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PropertyRemoved => "property-removed",
            Self::PropertyRenamed => "property-renamed",
            Self::PropertyTypeChanged => "property-type-changed",
            Self::PropertyRequired => "property-required",
            Self::SchemaRestructured => "schema-restructured",
        }
    }
}

impl std::fmt::Display for BreakingChangeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One breaking change affecting a logical property path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakingChange {
    pub change_type: BreakingChangeType,
    /// Logical property path affected (`sku.name`, `rules[].port`).
    pub property: String,
    pub description: String,
    /// How callers should adapt, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub migration_path: Option<String>,
}

impl BreakingChange {
    pub fn new(
        change_type: BreakingChangeType,
        property: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            change_type,
            property: property.into(),
            description: description.into(),
            migration_path: None,
        }
    }

    pub fn with_migration_path(mut self, path: impl Into<String>) -> Self {
        self.migration_path = Some(path.into());
        self
    }
}
