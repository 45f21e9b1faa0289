//! # apiver-core — Foundational Types for the Version Engine
//!
//! Defines the primitives shared by every other crate in the workspace:
//! validated identifier newtypes, the version support lifecycle, property
//! paths used in violation reports, and the canonical byte pipeline used to
//! fingerprint wire bodies and registered version sets.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `ResourceTypeId` and `ApiVersion`
//!    are validated at construction and at deserialization. No bare strings
//!    cross a crate boundary.
//!
//! 2. **Lexicographic version order.** `ApiVersion` orders by its string,
//!    which for `YYYY-MM-DD` is chronological order.
//!
//! 3. **`CanonicalBytes` newtype.** Every digest flows through
//!    `CanonicalBytes::new()` (RFC 8785), so two structurally identical
//!    bodies always produce the same bytes and the same digest.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `apiver-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod path;
pub mod support;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{ApiVersion, ResourceTypeId};
pub use path::{PathSegment, PropertyPath};
pub use support::SupportLevel;
pub use temporal::Timestamp;
