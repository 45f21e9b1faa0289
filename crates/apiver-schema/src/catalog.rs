//! # Version Catalogs
//!
//! A catalog is the complete version set of one resource type, kept in a
//! YAML or JSON file next to the resource definition:
//!
//! ```yaml
//! resource_type: Microsoft.Resources/resourceGroups
//! default_version: "2024-03-01"
//! versions:
//!   - version: "2024-03-01"
//!     support_level: active
//!     schema:
//!       properties:
//!         location: { type: { scalar: string }, required: true }
//! ```
//!
//! The format is chosen by file extension (`.yaml`/`.yml` for YAML,
//! anything else for JSON).

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use apiver_core::{ApiVersion, ResourceTypeId};

use crate::descriptor::VersionDescriptor;

/// Error loading a version catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("cannot read catalog '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog text is not a valid catalog document.
    #[error("invalid {format} catalog '{origin}': {reason}")]
    Parse {
        format: &'static str,
        origin: String,
        reason: String,
    },
}

/// The declared version set of one resource type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionCatalog {
    pub resource_type: ResourceTypeId,
    /// The version used when a caller does not pin one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<ApiVersion>,
    pub versions: Vec<VersionDescriptor>,
}

impl VersionCatalog {
    /// Parse a catalog from YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, CatalogError> {
        serde_yaml::from_str(text).map_err(|e| CatalogError::Parse {
            format: "YAML",
            origin: "<string>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Parse a catalog from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(text).map_err(|e| CatalogError::Parse {
            format: "JSON",
            origin: "<string>".to_string(),
            reason: e.to_string(),
        })
    }

    /// Load a catalog file, choosing the format from its extension.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let origin = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: origin.clone(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        };
        parsed.map_err(|e| match e {
            CatalogError::Parse { format, reason, .. } => CatalogError::Parse {
                format,
                origin,
                reason,
            },
            other => other,
        })
    }

    /// The default version, falling back to the newest non-preview version
    /// when the catalog does not name one.
    pub fn effective_default(&self) -> Option<&ApiVersion> {
        self.default_version.as_ref().or_else(|| {
            self.versions
                .iter()
                .filter(|d| d.version.channel().is_none())
                .map(|d| &d.version)
                .max()
        })
    }
}
