//! # Resource Definitions
//!
//! The capability every concrete resource type supplies to the constructor.
//! A resource type is one value implementing [`ResourceDefinition`]; there is
//! no base class to inherit from.
//!
//! [`CatalogResource`] implements the trait from a [`VersionCatalog`] file
//! for resource types that need no custom body logic.

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use apiver_core::{ApiVersion, ResourceTypeId};
use apiver_registry::{RegistryError, VersionRegistry};
use apiver_schema::{ApiSchema, CatalogError, VersionCatalog, VersionDescriptor};

use crate::parent::ParentResolver;

/// The operations a resource type provides.
pub trait ResourceDefinition {
    fn resource_type(&self) -> &ResourceTypeId;

    /// The version used when the caller does not pin one. Must be one of
    /// [`version_descriptors`](Self::version_descriptors).
    fn default_version(&self) -> &ApiVersion;

    /// The full version set, registered on first construction.
    fn version_descriptors(&self) -> Vec<VersionDescriptor>;

    /// Schema for the version resolved for an instance.
    fn api_schema(
        &self,
        registry: &VersionRegistry,
        version: &ApiVersion,
    ) -> Result<Arc<ApiSchema>, RegistryError> {
        registry.get_schema(self.resource_type(), version)
    }

    /// The raw, version-agnostic body. Must be a JSON object.
    fn create_resource_body(&self, _name: &str, properties: &Value) -> Value {
        properties.clone()
    }

    fn parent_resolver(&self) -> ParentResolver;
}

/// Error building a [`CatalogResource`].
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog for {resource_type} names no default version and has no stable version")]
    NoDefaultVersion { resource_type: ResourceTypeId },

    #[error("default version {version} of {resource_type} is not in its version set")]
    DefaultNotInSet {
        resource_type: ResourceTypeId,
        version: ApiVersion,
    },
}

/// A resource type defined entirely by its catalog.
#[derive(Debug, Clone)]
pub struct CatalogResource {
    catalog: VersionCatalog,
    default_version: ApiVersion,
    parent: ParentResolver,
}

impl CatalogResource {
    pub fn new(catalog: VersionCatalog, parent: ParentResolver) -> Result<Self, DefinitionError> {
        let default_version = catalog
            .effective_default()
            .cloned()
            .ok_or_else(|| DefinitionError::NoDefaultVersion {
                resource_type: catalog.resource_type.clone(),
            })?;
        if !catalog.versions.iter().any(|d| d.version == default_version) {
            return Err(DefinitionError::DefaultNotInSet {
                resource_type: catalog.resource_type.clone(),
                version: default_version,
            });
        }
        Ok(Self {
            catalog,
            default_version,
            parent,
        })
    }

    pub fn from_yaml_str(yaml: &str, parent: ParentResolver) -> Result<Self, DefinitionError> {
        Self::new(VersionCatalog::from_yaml_str(yaml)?, parent)
    }

    pub fn from_path(path: &Path, parent: ParentResolver) -> Result<Self, DefinitionError> {
        Self::new(VersionCatalog::from_path(path)?, parent)
    }

    pub fn catalog(&self) -> &VersionCatalog {
        &self.catalog
    }
}

impl ResourceDefinition for CatalogResource {
    fn resource_type(&self) -> &ResourceTypeId {
        &self.catalog.resource_type
    }

    fn default_version(&self) -> &ApiVersion {
        &self.default_version
    }

    fn version_descriptors(&self) -> Vec<VersionDescriptor> {
        self.catalog.versions.clone()
    }

    fn parent_resolver(&self) -> ParentResolver {
        self.parent.clone()
    }
}
