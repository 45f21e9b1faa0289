//! # The Constructor
//!
//! Runs one resource instance through the construction pipeline:
//!
//! 1. register the resource type's version set, or check it against the
//!    set already stored for that type;
//! 2. resolve the API version (caller pin or the type's default);
//! 3. build the raw body with the parent property removed;
//! 4. validate it against the resolved version's schema;
//! 5. transform it into the wire body;
//! 6. resolve the parent id and bind.
//!
//! Each step is a typestate transition of [`Construction`]. Any failure
//! drops the construction and returns a [`ConstructionError`] naming the
//! phase it was in; nothing reaches a [`BindingSink`] unless every step
//! succeeded.

use serde_json::Value;

use apiver_registry::{RegistryError, VersionRegistry};
use apiver_schema::model::json_type_name;
use apiver_schema::SchemaMapper;
use apiver_state::{Construction, ConstructionState};

use crate::binding::{reference_token, BindingSink, Constructed, ResolvedBinding, ResourceHandle, ResourceProps, Scope};
use crate::config::EngineConfig;
use crate::definition::ResourceDefinition;
use crate::error::ConstructionError;

/// Constructs resource instances against one registry.
#[derive(Debug, Clone)]
pub struct Constructor<'r> {
    registry: &'r VersionRegistry,
    config: EngineConfig,
}

impl<'r> Constructor<'r> {
    pub fn new(registry: &'r VersionRegistry, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &'r VersionRegistry {
        self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Construct the instance `id` under `scope`.
    pub fn construct<R>(
        &self,
        resource: &R,
        scope: &Scope,
        id: &str,
        props: ResourceProps,
    ) -> Result<Constructed, ConstructionError>
    where
        R: ResourceDefinition + ?Sized,
    {
        let resource_type = resource.resource_type().clone();
        let construct_path = scope.construct_path(id);
        let name = props.name.clone().unwrap_or_else(|| id.to_string());

        let construction = Construction::begin(resource_type.clone(), construct_path.clone());
        self.registry
            .register_resource_type(&resource_type, resource.version_descriptors())
            .map_err(|e| registry_error(&construction, e))?;

        // ── Version ──────────────────────────────────────────────────
        let construction = construction.resolving();
        let resolution = self
            .registry
            .resolve_version(&resource_type, props.api_version.as_ref(), resource.default_version())
            .map_err(|e| registry_error(&construction, e))?;
        let construction = construction.resolved(resolution.version.clone(), resolution.support_level);

        let migration = if resolution.is_deprecated() && self.config.migration_analysis {
            let latest = self
                .registry
                .latest_version(&resource_type)
                .map_err(|e| registry_error(&construction, e))?;
            let analysis = self
                .registry
                .analyze_migration(&resource_type, &resolution.version, &latest)
                .map_err(|e| registry_error(&construction, e))?;
            Some(analysis)
        } else {
            None
        };

        // ── Body ─────────────────────────────────────────────────────
        let construction = construction.building();
        let schema = resource
            .api_schema(self.registry, construction.version())
            .map_err(|e| registry_error(&construction, e))?;

        let parent_resolver = resource.parent_resolver();
        let mut body_input = props.properties.clone();
        if let (Some(property), Some(map)) = (parent_resolver.property(), body_input.as_object_mut()) {
            map.remove(property);
        }
        let body = resource.create_resource_body(&name, &body_input);
        if !body.is_object() {
            return Err(ConstructionError::MalformedBody {
                resource_type,
                construct_path,
                phase: construction.phase(),
                found: json_type_name(&body),
            });
        }

        let report = SchemaMapper::validate(&body, &schema).map_err(|source| ConstructionError::Validation {
            resource_type: resource_type.clone(),
            construct_path: construct_path.clone(),
            phase: construction.phase(),
            source,
        })?;
        for warning in &report.warnings {
            tracing::warn!(
                resource_type = %resource_type,
                construct = %construct_path,
                warning = %warning,
                "validation warning"
            );
        }

        // ── Wire body ────────────────────────────────────────────────
        let construction = construction.validated(body);
        let wire_body = SchemaMapper::transform(construction.body(), &schema, construction.version())
            .map_err(|source| ConstructionError::Transform {
                resource_type: resource_type.clone(),
                construct_path: construct_path.clone(),
                phase: construction.phase(),
                source,
            })?;

        // ── Parent ───────────────────────────────────────────────────
        let construction = construction.transformed(wire_body);
        let parent_id = parent_resolver
            .resolve(&resource_type, &props.properties, scope)
            .map_err(|source| ConstructionError::Parent {
                resource_type: resource_type.clone(),
                construct_path: construct_path.clone(),
                phase: construction.phase(),
                source,
            })?;

        let (resource_type, construct_path, bound, _) = construction.bind(parent_id).into_parts();
        tracing::debug!(
            resource_type = %resource_type,
            construct = %construct_path,
            version = %bound.version,
            parent = %bound.parent_id,
            "resource bound"
        );

        let handle = ResourceHandle {
            reference: reference_token(&resource_type, &construct_path),
            construct_path,
            name: name.clone(),
            resolved_api_version: bound.version.clone(),
            support_level: bound.support_level,
            advisories: resolution.advisories,
            warnings: report.warnings,
            migration,
        };
        let binding = ResolvedBinding {
            resource_type,
            api_version: bound.version,
            parent_id: bound.parent_id,
            name,
            wire_body: bound.wire_body,
        };
        Ok(Constructed { handle, binding })
    }

    /// Construct and hand the binding to `sink`, returning only the handle.
    pub fn construct_into<R, K>(
        &self,
        sink: &mut K,
        resource: &R,
        scope: &Scope,
        id: &str,
        props: ResourceProps,
    ) -> Result<ResourceHandle, ConstructionError>
    where
        R: ResourceDefinition + ?Sized,
        K: BindingSink + ?Sized,
    {
        let Constructed { handle, binding } = self.construct(resource, scope, id, props)?;
        sink.emit(binding);
        Ok(handle)
    }
}

fn registry_error<S: ConstructionState>(
    construction: &Construction<S>,
    source: RegistryError,
) -> ConstructionError {
    ConstructionError::Registry {
        resource_type: construction.resource_type.clone(),
        construct_path: construction.construct_path.clone(),
        phase: construction.phase(),
        source,
    }
}
