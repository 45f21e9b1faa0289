//! # Registration State Machine
//!
//! Tracks whether a resource type's version set has been pushed into the
//! registry.
//!
//! ```text
//! Unregistered ──begin()──▶ Registering ──complete()──▶ Registered
//!       ▲                        │
//!       └────────abort()─────────┘
//! ```
//!
//! `Registered` is final: repeat registrations are answered from the stored
//! set without touching the state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use apiver_core::{ContentDigest, ResourceTypeId, Timestamp};

/// Registration lifecycle of one resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationState {
    Unregistered,
    /// A version set is being validated; concurrent registrations of the
    /// same type must wait for or observe the outcome.
    Registering,
    Registered,
}

impl RegistrationState {
    /// Returns the canonical state name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unregistered => "UNREGISTERED",
            Self::Registering => "REGISTERING",
            Self::Registered => "REGISTERED",
        }
    }

    /// Whether the state machine allows moving from `self` to `to`.
    pub fn can_transition_to(&self, to: RegistrationState) -> bool {
        matches!(
            (self, to),
            (Self::Unregistered, Self::Registering)
                | (Self::Registering, Self::Registered)
                | (Self::Registering, Self::Unregistered)
        )
    }
}

impl std::fmt::Display for RegistrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from state machine transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Attempted transition is not allowed by the state machine.
    #[error("invalid registration transition for {resource_type}: {from} -> {to}")]
    InvalidTransition {
        resource_type: String,
        from: RegistrationState,
        to: RegistrationState,
    },
}

/// Record of a single registration state change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationTransition {
    pub from_state: RegistrationState,
    pub to_state: RegistrationState,
    pub timestamp: Timestamp,
    pub reason: Option<String>,
}

/// Registration bookkeeping for one resource type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeRegistration {
    pub resource_type: ResourceTypeId,
    state: RegistrationState,
    /// Fingerprint of the stored version set, once registered.
    fingerprint: Option<ContentDigest>,
    transition_log: Vec<RegistrationTransition>,
}

impl TypeRegistration {
    /// A fresh, unregistered type.
    pub fn new(resource_type: ResourceTypeId) -> Self {
        Self {
            resource_type,
            state: RegistrationState::Unregistered,
            fingerprint: None,
            transition_log: Vec::new(),
        }
    }

    pub fn state(&self) -> RegistrationState {
        self.state
    }

    pub fn is_registered(&self) -> bool {
        self.state == RegistrationState::Registered
    }

    /// Fingerprint of the registered version set.
    pub fn fingerprint(&self) -> Option<&ContentDigest> {
        self.fingerprint.as_ref()
    }

    pub fn transition_log(&self) -> &[RegistrationTransition] {
        &self.transition_log
    }

    /// `Unregistered → Registering`. Fails if the type is already being
    /// registered or is registered; this is the per-type compare-and-set.
    pub fn begin(&mut self) -> Result<(), StateError> {
        self.try_transition(RegistrationState::Registering, None)
    }

    /// `Registering → Registered`, recording the version set fingerprint.
    pub fn complete(&mut self, fingerprint: ContentDigest) -> Result<(), StateError> {
        self.try_transition(
            RegistrationState::Registered,
            Some(format!("version set {fingerprint}")),
        )?;
        self.fingerprint = Some(fingerprint);
        Ok(())
    }

    /// `Registering → Unregistered` after the version set was rejected.
    pub fn abort(&mut self, reason: impl Into<String>) -> Result<(), StateError> {
        self.try_transition(RegistrationState::Unregistered, Some(reason.into()))
    }

    fn try_transition(&mut self, to: RegistrationState, reason: Option<String>) -> Result<(), StateError> {
        if !self.state.can_transition_to(to) {
            return Err(StateError::InvalidTransition {
                resource_type: self.resource_type.to_string(),
                from: self.state,
                to,
            });
        }
        tracing::debug!(
            resource_type = %self.resource_type,
            from = %self.state,
            to = %to,
            "registration transition"
        );
        self.transition_log.push(RegistrationTransition {
            from_state: self.state,
            to_state: to,
            timestamp: Timestamp::now(),
            reason,
        });
        self.state = to;
        Ok(())
    }
}
