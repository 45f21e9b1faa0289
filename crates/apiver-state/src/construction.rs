//! # Construction Typestate Machine
//!
//! One resource instance moves through seven phases. Each phase is a
//! distinct type holding the data produced so far; transitions consume the
//! current `Construction<S>` and return the next one.
//!
//! ## Allowed Transitions
//!
//! ```text
//! Registered ──resolving()──▶ VersionResolving ──resolved()──▶ VersionResolved
//!                                                                    │
//!                                                              building()
//!                                                                    ▼
//!        Bound ◀──bind()── Transformed ◀──transformed()── Validated ◀──validated()── BodyBuilding
//! ```
//!
//! There is no error state. A failure in any phase drops the construction;
//! the orchestrator reports [`Construction::phase`] of the dropped value.
//!
//! ```compile_fail
//! use apiver_state::construction::*;
//! use apiver_core::ResourceTypeId;
//!
//! let c = Construction::begin(
//!     ResourceTypeId::new("Microsoft.Storage/storageAccounts").unwrap(),
//!     "app/storage",
//! );
//! // ERROR: no method named `bind` found for `Construction<Registered>`
//! let _ = c.bind("/subscriptions/x".to_string());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use apiver_core::{ApiVersion, ResourceTypeId, SupportLevel, Timestamp};

// ─── State Types ─────────────────────────────────────────────────────

/// The resource type is registered; nothing instance-specific is known.
#[derive(Debug, Clone)]
pub struct Registered;

/// A version is being resolved from the explicit pin or the default.
#[derive(Debug, Clone)]
pub struct VersionResolving;

/// The API version for this instance is fixed.
#[derive(Debug, Clone)]
pub struct VersionResolved {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
}

/// The raw, version-agnostic body is being produced.
#[derive(Debug, Clone)]
pub struct BodyBuilding {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
}

/// The raw body passed schema validation.
#[derive(Debug, Clone)]
pub struct Validated {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
    pub body: Value,
}

/// The wire body for the resolved version is ready.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
    pub wire_body: Value,
}

/// Terminal: the wire body is bound to its parent scope.
#[derive(Debug, Clone)]
pub struct Bound {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
    pub wire_body: Value,
    pub parent_id: String,
}

// ─── Sealed Trait ────────────────────────────────────────────────────

mod private {
    pub trait Sealed {}
    impl Sealed for super::Registered {}
    impl Sealed for super::VersionResolving {}
    impl Sealed for super::VersionResolved {}
    impl Sealed for super::BodyBuilding {}
    impl Sealed for super::Validated {}
    impl Sealed for super::Transformed {}
    impl Sealed for super::Bound {}
}

/// Marker trait for construction phases. Sealed.
pub trait ConstructionState: private::Sealed + std::fmt::Debug {
    /// The runtime phase tag for this state.
    const PHASE: ConstructionPhase;
}

impl ConstructionState for Registered {
    const PHASE: ConstructionPhase = ConstructionPhase::Registered;
}
impl ConstructionState for VersionResolving {
    const PHASE: ConstructionPhase = ConstructionPhase::VersionResolving;
}
impl ConstructionState for VersionResolved {
    const PHASE: ConstructionPhase = ConstructionPhase::VersionResolved;
}
impl ConstructionState for BodyBuilding {
    const PHASE: ConstructionPhase = ConstructionPhase::BodyBuilding;
}
impl ConstructionState for Validated {
    const PHASE: ConstructionPhase = ConstructionPhase::Validated;
}
impl ConstructionState for Transformed {
    const PHASE: ConstructionPhase = ConstructionPhase::Transformed;
}
impl ConstructionState for Bound {
    const PHASE: ConstructionPhase = ConstructionPhase::Bound;
}

// ─── Runtime Phase Tag ───────────────────────────────────────────────

/// Runtime name of a construction phase, used in error reports and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConstructionPhase {
    Registered,
    VersionResolving,
    VersionResolved,
    BodyBuilding,
    Validated,
    Transformed,
    Bound,
}

impl ConstructionPhase {
    /// Returns the canonical phase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::VersionResolving => "VERSION_RESOLVING",
            Self::VersionResolved => "VERSION_RESOLVED",
            Self::BodyBuilding => "BODY_BUILDING",
            Self::Validated => "VALIDATED",
            Self::Transformed => "TRANSFORMED",
            Self::Bound => "BOUND",
        }
    }

    /// The phase that follows this one, or `None` for `Bound`.
    pub fn next(&self) -> Option<ConstructionPhase> {
        match self {
            Self::Registered => Some(Self::VersionResolving),
            Self::VersionResolving => Some(Self::VersionResolved),
            Self::VersionResolved => Some(Self::BodyBuilding),
            Self::BodyBuilding => Some(Self::Validated),
            Self::Validated => Some(Self::Transformed),
            Self::Transformed => Some(Self::Bound),
            Self::Bound => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Bound)
    }
}

impl std::fmt::Display for ConstructionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Phase Record ────────────────────────────────────────────────────

/// Record of a single phase transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRecord {
    pub from: ConstructionPhase,
    pub to: ConstructionPhase,
    pub timestamp: Timestamp,
}

// ─── The Construction ────────────────────────────────────────────────

/// One resource instance under construction, parameterized by its phase.
#[derive(Debug)]
pub struct Construction<S: ConstructionState> {
    pub resource_type: ResourceTypeId,
    /// Path of the instance in the construct tree (`app/network/subnet1`).
    pub construct_path: String,
    phase_log: Vec<PhaseRecord>,
    state: S,
}

impl<S: ConstructionState> Construction<S> {
    /// The runtime tag of the current phase.
    pub fn phase(&self) -> ConstructionPhase {
        S::PHASE
    }

    /// The phase-specific data gathered so far.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn phase_log(&self) -> &[PhaseRecord] {
        &self.phase_log
    }

    fn transition_to<T: ConstructionState>(self, advance: impl FnOnce(S) -> T) -> Construction<T> {
        let Construction {
            resource_type,
            construct_path,
            mut phase_log,
            state,
        } = self;
        tracing::debug!(
            resource_type = %resource_type,
            construct = %construct_path,
            from = %S::PHASE,
            to = %T::PHASE,
            "construction phase"
        );
        phase_log.push(PhaseRecord {
            from: S::PHASE,
            to: T::PHASE,
            timestamp: Timestamp::now(),
        });
        Construction {
            resource_type,
            construct_path,
            phase_log,
            state: advance(state),
        }
    }
}

// ─── Phase-Specific Impl Blocks ─────────────────────────────────────

impl Construction<Registered> {
    /// Start constructing an instance of a registered resource type.
    pub fn begin(resource_type: ResourceTypeId, construct_path: impl Into<String>) -> Self {
        Self {
            resource_type,
            construct_path: construct_path.into(),
            phase_log: Vec::new(),
            state: Registered,
        }
    }

    pub fn resolving(self) -> Construction<VersionResolving> {
        self.transition_to(|_| VersionResolving)
    }
}

impl Construction<VersionResolving> {
    pub fn resolved(
        self,
        version: ApiVersion,
        support_level: SupportLevel,
    ) -> Construction<VersionResolved> {
        self.transition_to(|_| VersionResolved {
            version,
            support_level,
        })
    }
}

impl Construction<VersionResolved> {
    pub fn version(&self) -> &ApiVersion {
        &self.state.version
    }

    pub fn building(self) -> Construction<BodyBuilding> {
        self.transition_to(|s| BodyBuilding {
            version: s.version,
            support_level: s.support_level,
        })
    }
}

impl Construction<BodyBuilding> {
    pub fn version(&self) -> &ApiVersion {
        &self.state.version
    }

    /// The raw body passed validation.
    pub fn validated(self, body: Value) -> Construction<Validated> {
        self.transition_to(|s| Validated {
            version: s.version,
            support_level: s.support_level,
            body,
        })
    }
}

impl Construction<Validated> {
    pub fn body(&self) -> &Value {
        &self.state.body
    }

    pub fn version(&self) -> &ApiVersion {
        &self.state.version
    }

    pub fn transformed(self, wire_body: Value) -> Construction<Transformed> {
        self.transition_to(|s| Transformed {
            version: s.version,
            support_level: s.support_level,
            wire_body,
        })
    }
}

impl Construction<Transformed> {
    pub fn wire_body(&self) -> &Value {
        &self.state.wire_body
    }

    pub fn bind(self, parent_id: String) -> Construction<Bound> {
        self.transition_to(|s| Bound {
            version: s.version,
            support_level: s.support_level,
            wire_body: s.wire_body,
            parent_id,
        })
    }
}

impl Construction<Bound> {
    /// Consume the finished construction.
    pub fn into_parts(self) -> (ResourceTypeId, String, Bound, Vec<PhaseRecord>) {
        (self.resource_type, self.construct_path, self.state, self.phase_log)
    }
}
