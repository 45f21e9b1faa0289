//! # Construction Errors
//!
//! A construction either reaches `Bound` or fails with one of these. Every
//! variant names the resource type, the construct, and the phase the
//! construction was in when it stopped.

use thiserror::Error;

use apiver_core::ResourceTypeId;
use apiver_registry::RegistryError;
use apiver_schema::{TransformError, ValidationFailure, Violation};
use apiver_state::ConstructionPhase;

use crate::parent::ParentError;

/// Why a construction aborted.
#[derive(Error, Debug)]
pub enum ConstructionError {
    /// The resource type's version set could not be registered, or a
    /// registry lookup failed.
    #[error("{resource_type} `{construct_path}` failed in {phase}: {source}")]
    Registry {
        resource_type: ResourceTypeId,
        construct_path: String,
        phase: ConstructionPhase,
        source: RegistryError,
    },

    /// `create_resource_body` produced something other than a JSON object.
    #[error("{resource_type} `{construct_path}` failed in {phase}: resource body must be an object, got {found}")]
    MalformedBody {
        resource_type: ResourceTypeId,
        construct_path: String,
        phase: ConstructionPhase,
        found: &'static str,
    },

    #[error("{resource_type} `{construct_path}` failed in {phase}: {source}")]
    Validation {
        resource_type: ResourceTypeId,
        construct_path: String,
        phase: ConstructionPhase,
        source: ValidationFailure,
    },

    #[error("{resource_type} `{construct_path}` failed in {phase}: {source}")]
    Transform {
        resource_type: ResourceTypeId,
        construct_path: String,
        phase: ConstructionPhase,
        source: TransformError,
    },

    #[error("{resource_type} `{construct_path}` failed in {phase}: {source}")]
    Parent {
        resource_type: ResourceTypeId,
        construct_path: String,
        phase: ConstructionPhase,
        source: ParentError,
    },
}

impl ConstructionError {
    pub fn phase(&self) -> ConstructionPhase {
        match self {
            Self::Registry { phase, .. }
            | Self::MalformedBody { phase, .. }
            | Self::Validation { phase, .. }
            | Self::Transform { phase, .. }
            | Self::Parent { phase, .. } => *phase,
        }
    }

    pub fn resource_type(&self) -> &ResourceTypeId {
        match self {
            Self::Registry { resource_type, .. }
            | Self::MalformedBody { resource_type, .. }
            | Self::Validation { resource_type, .. }
            | Self::Transform { resource_type, .. }
            | Self::Parent { resource_type, .. } => resource_type,
        }
    }

    /// The registry error, if the construction failed on one.
    pub fn registry_error(&self) -> Option<&RegistryError> {
        match self {
            Self::Registry { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Schema violations, if the construction failed validation.
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation { source, .. } => source.violations(),
            _ => &[],
        }
    }
}
