//! # Error Types
//!
//! Errors raised while constructing core primitives. Higher crates wrap
//! these in their own `thiserror` enums with additional context.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A resource type identifier failed validation.
    #[error("invalid resource type {value:?}: {reason}")]
    InvalidResourceType {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An API version string failed validation.
    #[error("invalid api version {value:?}: {reason}")]
    InvalidApiVersion {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A support level string is not one of the four lifecycle stages.
    #[error("unknown support level {0:?} (expected preview, active, maintenance or deprecated)")]
    UnknownSupportLevel(String),

    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
