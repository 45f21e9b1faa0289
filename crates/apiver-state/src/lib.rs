//! # apiver-state — Registration and Construction State Machines
//!
//! ## State Machines
//!
//! - **Registration** (`registration.rs`): per resource type,
//!   `Unregistered → Registering → Registered`, with
//!   `Registering → Unregistered` when a version set is rejected.
//!   Runtime-checked; the registry drives it under its lock.
//!
//! - **Construction** (`construction.rs`): per resource instance,
//!   `Registered → VersionResolving → VersionResolved → BodyBuilding →
//!   Validated → Transformed → Bound`. Typestate-encoded: each phase is a
//!   distinct type carrying exactly the data produced so far, so a wire
//!   body cannot be bound before it was validated and transformed.
//!
//! ## Design
//!
//! Construction has no recovery state. A failure drops the in-flight
//! `Construction<S>`; the caller reports [`ConstructionPhase`] of the phase
//! that failed and nothing partial escapes.

pub mod construction;
pub mod registration;

// ─── Construction re-exports ────────────────────────────────────────

pub use construction::{
    Bound, BodyBuilding, Construction, ConstructionPhase, ConstructionState, PhaseRecord,
    Registered, Transformed, Validated, VersionResolved, VersionResolving,
};

// ─── Registration re-exports ────────────────────────────────────────

pub use registration::{RegistrationState, RegistrationTransition, StateError, TypeRegistration};
