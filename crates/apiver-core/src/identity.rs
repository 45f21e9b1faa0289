//! # Identifier Newtypes
//!
//! `ResourceTypeId` names a resource category (`Provider.Namespace/type`),
//! `ApiVersion` names one dated revision of that category's shape. Both are
//! validated on construction and on deserialization, so a value of either
//! type is always well-formed.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ─── ResourceTypeId ──────────────────────────────────────────────────

/// Stable key for a resource category, e.g. `Microsoft.Storage/storageAccounts`.
///
/// # Validation
///
/// - Non-empty, no whitespace.
/// - Contains a `/` separating the provider namespace from the type path.
/// - No empty segments (`A//b`, `A/`, `/b` are rejected).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ResourceTypeId(String);

impl ResourceTypeId {
    /// Create a resource type identifier, validating its shape.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        let reject = |reason| CoreError::InvalidResourceType {
            value: value.clone(),
            reason,
        };
        if value.is_empty() {
            return Err(reject("must not be empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(reject("must not contain whitespace"));
        }
        if !value.contains('/') {
            return Err(reject("must have the form Provider.Namespace/type"));
        }
        if value.split('/').any(str::is_empty) {
            return Err(reject("must not contain empty segments"));
        }
        Ok(Self(value))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The provider namespace (`Microsoft.Storage`).
    pub fn namespace(&self) -> &str {
        self.0.split('/').next().unwrap_or(&self.0)
    }

    /// The final type path segment (`storageAccounts`, or `subnets` for
    /// `Microsoft.Network/virtualNetworks/subnets`).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Lowercase identifier-safe form used in reference tokens
    /// (`microsoft_storage_storageaccounts`).
    pub fn slug(&self) -> String {
        self.0
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl<'de> Deserialize<'de> for ResourceTypeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl FromStr for ResourceTypeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ResourceTypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── ApiVersion ──────────────────────────────────────────────────────

/// A dated API revision: `YYYY-MM-DD`, optionally followed by a lowercase
/// channel suffix (`2024-05-01-preview`).
///
/// Ordering is lexicographic on the string. For the fixed-width date prefix
/// this is chronological order, and a suffixed version sorts after the plain
/// version of the same date.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiVersion {
    // Field order matters: derived `Ord` compares `raw` first.
    raw: String,
    date: NaiveDate,
}

const DATE_LEN: usize = 10;

impl ApiVersion {
    /// Create an API version, validating the date prefix and optional suffix.
    pub fn new(value: impl Into<String>) -> Result<Self, CoreError> {
        let value = value.into();
        let reject = |reason| CoreError::InvalidApiVersion {
            value: value.clone(),
            reason,
        };
        if !value.is_ascii() || value.len() < DATE_LEN {
            return Err(reject("must start with a YYYY-MM-DD date"));
        }
        let (date, suffix) = value.split_at(DATE_LEN);
        let shape_ok = date.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
        let parsed = match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(d) if shape_ok => d,
            _ => return Err(reject("must start with a valid YYYY-MM-DD date")),
        };
        if !suffix.is_empty() {
            let channel = suffix
                .strip_prefix('-')
                .ok_or_else(|| reject("suffix must be separated by '-'"))?;
            if channel.is_empty()
                || !channel
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            {
                return Err(reject("suffix must be lowercase alphanumeric"));
            }
        }
        Ok(Self {
            raw: value,
            date: parsed,
        })
    }

    /// The version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The calendar date of this revision.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// The channel suffix (`preview` in `2024-05-01-preview`), if any.
    pub fn channel(&self) -> Option<&str> {
        self.raw.get(DATE_LEN + 1..).filter(|s| !s.is_empty())
    }
}

impl Serialize for ApiVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl FromStr for ApiVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
