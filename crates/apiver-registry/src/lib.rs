//! # apiver-registry — The Version Registry
//!
//! Stores, per resource type, the set of API versions the engine supports
//! and answers every question about them: which version an instance uses,
//! what a version's schema is, where it sits in its lifecycle, and what a
//! migration between two versions involves.
//!
//! ## Registration
//!
//! [`VersionRegistry::register_resource_type`] accepts a non-empty list of
//! [`VersionDescriptor`](apiver_schema::VersionDescriptor)s with unique
//! versions and well-formed schemas. The set is fingerprinted (SHA-256 over
//! RFC 8785 JSON of the descriptors in version order). Repeating an
//! identical set is a no-op; a different set is refused or ignored per
//! [`ConflictPolicy`].
//!
//! ## Resolution
//!
//! [`VersionRegistry::resolve_version`] takes the caller's pin or the
//! resource type's default. It never picks "the newest" on its own.
//! Deprecated and sunset versions resolve with [`Advisory`] values, which
//! are also logged at `warn`.
//!
//! ## Crate Policy
//!
//! - No global state: a registry is an ordinary value.
//! - Registered version sets are immutable and shared as `Arc`s.
//! - No `unwrap()` or `panic!()` outside tests.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod migration;
pub mod registry;
pub mod resolution;

pub use config::{ConflictPolicy, RegistryConfig};
pub use error::{RegistryError, VersionSetProblem};
pub use lifecycle::{VersionConstraints, VersionLifecycle};
pub use migration::{MigrationAnalysis, MigrationEffort};
pub use registry::{RegisteredType, RegistrationOutcome, VersionRegistry};
pub use resolution::{Advisory, ResolutionSource, VersionResolution};
