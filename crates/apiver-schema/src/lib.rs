//! # apiver-schema — Versioned Schemas and the Schema Mapper
//!
//! Describes the shape of one (resource type, API version) pair and maps
//! caller-supplied properties onto it.
//!
//! ## Validation (`validate`)
//!
//! [`SchemaMapper::validate`] walks the schema and reports every
//! `MissingRequiredProperty`, `TypeMismatch`, `ValidationRuleViolation` and
//! `UnknownProperty`, each naming the dotted/bracketed property path.
//!
//! ## Transformation (`transform`)
//!
//! [`SchemaMapper::transform`] produces the wire body for a version: per
//! version wire paths from the [`RenameTable`], defaults for omitted
//! optional properties, recursive rewriting of nested objects and arrays.
//! It is deterministic and total over validated input.
//!
//! ## Registration Support
//!
//! [`check_well_formed`] rejects schemas that could make either operation
//! misbehave, [`diff_schemas`] derives breaking changes between versions,
//! and [`VersionCatalog`] loads complete version sets from YAML or JSON.
//!
//! ## Crate Policy
//!
//! - Depends only on `apiver-core` internally.
//! - Every function here is pure: no I/O except catalog file loading, no
//!   shared state, no logging.

pub mod catalog;
pub mod descriptor;
pub mod diff;
pub mod model;
pub mod rename;
pub mod rules;
pub mod transform;
pub mod validate;
pub mod wellformed;

pub use catalog::{CatalogError, VersionCatalog};
pub use descriptor::{BreakingChange, BreakingChangeType, VersionDescriptor};
pub use diff::diff_schemas;
pub use model::{ApiSchema, PropertyDefinition, PropertyType, ScalarKind, ValidationRule};
pub use rename::{RenameTable, WireEntry};
pub use transform::TransformError;
pub use validate::{ValidationFailure, ValidationReport, ValidationWarning, Violation};
pub use wellformed::{check_well_formed, SchemaDefect};

use serde_json::Value;

use apiver_core::ApiVersion;

/// The validation and transformation engine.
///
/// Stateless; the methods are grouped on a type so callers can name the
/// component they depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMapper;

impl SchemaMapper {
    /// Validate `properties` against `schema`.
    pub fn validate(
        properties: &Value,
        schema: &ApiSchema,
    ) -> Result<ValidationReport, ValidationFailure> {
        validate::validate(properties, schema)
    }

    /// Transform validated `properties` into the wire body for `version`.
    pub fn transform(
        properties: &Value,
        schema: &ApiSchema,
        version: &ApiVersion,
    ) -> Result<Value, TransformError> {
        transform::transform(properties, schema, version)
    }
}
