//! # Parent Resolution
//!
//! Child resources (a subnet inside a virtual network, a rule inside a rule
//! collection) are addressed under their parent's id. The resolver reads
//! that id from the caller's properties, a fallback, the construction scope
//! or a fixed value, and checks only that the id it settles on is present
//! and path-shaped: an absolute id (`/subscriptions/...`) or an opaque
//! reference token (`${...}`). It does not check that the parent exists.
//!
//! The parent property is addressing, not payload: the constructor removes
//! it before the resource body is built.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use apiver_core::ResourceTypeId;

use crate::binding::Scope;

/// Error resolving a parent id.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParentError {
    /// The resolved parent id is absent, empty, or not path-shaped.
    #[error(
        "{resource_type} requires a parent reference{}{}",
        describe_property(.property),
        describe_found(.found)
    )]
    MissingParentReference {
        resource_type: ResourceTypeId,
        /// The property the id can be supplied in; `None` for a fixed parent.
        property: Option<String>,
        /// The unusable value, when one was supplied.
        found: Option<String>,
    },
}

fn describe_property(property: &Option<String>) -> String {
    match property {
        Some(property) => format!(" in `{property}`"),
        None => String::new(),
    }
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(value) => format!(" (got {value:?}, which is not a resource id or reference)"),
        None => String::new(),
    }
}

/// How a resource type finds the id of its enclosing scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParentResolver {
    /// The parent id must be supplied in `property`.
    Required { property: String },
    /// Top-level resource: `property` when supplied, else `fallback`, else
    /// the id of the construction scope.
    Optional {
        property: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<String>,
    },
    /// Always the same parent.
    Fixed { id: String },
}

impl ParentResolver {
    pub fn required(property: impl Into<String>) -> Self {
        Self::Required {
            property: property.into(),
        }
    }

    pub fn optional(property: impl Into<String>) -> Self {
        Self::Optional {
            property: property.into(),
            fallback: None,
        }
    }

    pub fn fixed(id: impl Into<String>) -> Self {
        Self::Fixed { id: id.into() }
    }

    /// The property this resolver reads, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            Self::Required { property } | Self::Optional { property, .. } => Some(property),
            Self::Fixed { .. } => None,
        }
    }

    /// Resolve the parent id of one instance.
    pub fn resolve(
        &self,
        resource_type: &ResourceTypeId,
        properties: &Value,
        scope: &Scope,
    ) -> Result<String, ParentError> {
        let id = match self {
            Self::Fixed { id } => id.clone(),
            Self::Required { property } => lookup(resource_type, property, properties)?.unwrap_or_default(),
            Self::Optional { property, fallback } => lookup(resource_type, property, properties)?
                .or_else(|| fallback.clone())
                .unwrap_or_else(|| scope.id().to_string()),
        };
        if is_path_shaped(&id) {
            return Ok(id);
        }
        Err(ParentError::MissingParentReference {
            resource_type: resource_type.clone(),
            property: self.property().map(str::to_string),
            found: (!id.trim().is_empty()).then_some(id),
        })
    }
}

/// Read `property`, treating null and empty strings as absent.
fn lookup(
    resource_type: &ResourceTypeId,
    property: &str,
    properties: &Value,
) -> Result<Option<String>, ParentError> {
    let malformed = |found: String| ParentError::MissingParentReference {
        resource_type: resource_type.clone(),
        property: Some(property.to_string()),
        found: Some(found),
    };
    match properties.get(property) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) if is_path_shaped(s) => Ok(Some(s.clone())),
        Some(Value::String(s)) => Err(malformed(s.clone())),
        Some(other) => Err(malformed(other.to_string())),
    }
}

/// An absolute resource id or an opaque `${...}` reference token.
pub fn is_path_shaped(id: &str) -> bool {
    (id.starts_with('/') && id.len() > 1) || (id.starts_with("${") && id.ends_with('}') && id.len() > 3)
}
