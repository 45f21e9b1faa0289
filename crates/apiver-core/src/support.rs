//! # Support Level — Version Lifecycle
//!
//! A registered API version sits at one stage of the provider's lifecycle.
//! The stage drives advisories (deprecated versions still resolve, but
//! callers are warned) and the choice of migration target.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;

/// Lifecycle stage of an API version.
///
/// ```text
/// Preview ──▶ Active ──▶ Maintenance ──▶ Deprecated
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupportLevel {
    /// Early access; shape may still change.
    Preview,
    /// Generally available and recommended.
    Active,
    /// Supported, but only receiving fixes.
    Maintenance,
    /// Still accepted by the provider; scheduled for removal.
    Deprecated,
}

impl SupportLevel {
    /// All levels in lifecycle order.
    pub const ALL: [SupportLevel; 4] = [
        Self::Preview,
        Self::Active,
        Self::Maintenance,
        Self::Deprecated,
    ];

    /// Returns the snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preview => "preview",
            Self::Active => "active",
            Self::Maintenance => "maintenance",
            Self::Deprecated => "deprecated",
        }
    }

    /// The stage a version moves to next, or `None` once deprecated.
    pub fn next_phase(&self) -> Option<SupportLevel> {
        match self {
            Self::Preview => Some(Self::Active),
            Self::Active => Some(Self::Maintenance),
            Self::Maintenance => Some(Self::Deprecated),
            Self::Deprecated => None,
        }
    }

    /// Whether use of a version at this level should raise an advisory.
    pub fn is_deprecated(&self) -> bool {
        matches!(self, Self::Deprecated)
    }
}

impl std::fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSupportLevel(s.to_string()))
    }
}
