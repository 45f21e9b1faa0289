//! # Registry Errors
//!
//! Every registry failure names the resource type it concerns, and the
//! version when one is involved.

use thiserror::Error;

use apiver_core::{ApiVersion, CanonicalizationError, ContentDigest, ResourceTypeId};
use apiver_schema::SchemaDefect;
use apiver_state::StateError;

/// Errors raised by [`VersionRegistry`](crate::VersionRegistry) operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// The version list offered for registration is empty, repeats a
    /// version, or carries a malformed schema.
    #[error("invalid version set for {resource_type}: {}", render_problems(.problems))]
    InvalidVersionSet {
        resource_type: ResourceTypeId,
        problems: Vec<VersionSetProblem>,
    },

    /// The type is registered with a different version set and the
    /// configured conflict policy is `reject`.
    #[error(
        "{resource_type} is already registered with version set {existing}; \
         refusing different set {incoming}"
    )]
    ConflictingVersionSet {
        resource_type: ResourceTypeId,
        existing: ContentDigest,
        incoming: ContentDigest,
    },

    #[error("resource type {resource_type} is not registered")]
    ResourceTypeNotRegistered { resource_type: ResourceTypeId },

    /// A requested API version is not in the registered set.
    #[error(
        "api version {version} is not supported by {resource_type} (supported: {})",
        render_versions(.supported)
    )]
    UnknownApiVersion {
        resource_type: ResourceTypeId,
        version: ApiVersion,
        /// Registered versions, newest first.
        supported: Vec<ApiVersion>,
    },

    /// A lookup named a version the type does not have.
    #[error("version {version} not found for {resource_type}")]
    VersionNotFound {
        resource_type: ResourceTypeId,
        version: ApiVersion,
    },

    #[error(transparent)]
    State(#[from] StateError),

    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// One reason a version list was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionSetProblem {
    #[error("the version list is empty")]
    Empty,

    #[error("version {0} appears more than once")]
    DuplicateVersion(ApiVersion),

    #[error("schema for {version} is malformed: {}", render_defects(.defects))]
    MalformedSchema {
        version: ApiVersion,
        defects: Vec<SchemaDefect>,
    },
}

fn render_problems(problems: &[VersionSetProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

fn render_defects(defects: &[SchemaDefect]) -> String {
    defects
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_versions(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ApiVersion::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
