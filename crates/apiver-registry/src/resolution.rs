//! # Version Resolution
//!
//! The outcome of choosing the API version for one resource instance, and
//! the non-fatal advisories that choice can raise. Advisories are logged by
//! the registry and also returned here so callers can surface them.

use chrono::NaiveDate;
use serde::Serialize;

use apiver_core::{ApiVersion, ResourceTypeId, SupportLevel};

/// Where the resolved version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// The caller pinned the version.
    Explicit,
    /// The resource type's nominated default.
    Default,
}

/// A resolved version and the advisories it raised.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionResolution {
    pub version: ApiVersion,
    pub support_level: SupportLevel,
    pub source: ResolutionSource,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
}

impl VersionResolution {
    pub fn is_deprecated(&self) -> bool {
        self.support_level.is_deprecated()
    }
}

/// A non-fatal condition worth telling the user about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The resolved version is deprecated.
    DeprecatedVersionUsed {
        resource_type: ResourceTypeId,
        version: ApiVersion,
        /// The version the registry would recommend instead.
        latest: ApiVersion,
    },
    /// The resolved version is past its published sunset date.
    SunsetPassed {
        resource_type: ResourceTypeId,
        version: ApiVersion,
        sunset_date: NaiveDate,
    },
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DeprecatedVersionUsed {
                resource_type,
                version,
                latest,
            } => write!(
                f,
                "{resource_type} api version {version} is deprecated; consider {latest}"
            ),
            Self::SunsetPassed {
                resource_type,
                version,
                sunset_date,
            } => write!(
                f,
                "{resource_type} api version {version} reached its sunset date {sunset_date}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_display_and_tag() {
        let advisory = Advisory::DeprecatedVersionUsed {
            resource_type: ResourceTypeId::new("Microsoft.Web/sites").unwrap(),
            version: ApiVersion::new("2020-06-01").unwrap(),
            latest: ApiVersion::new("2024-04-01").unwrap(),
        };
        assert_eq!(
            advisory.to_string(),
            "Microsoft.Web/sites api version 2020-06-01 is deprecated; consider 2024-04-01"
        );
        let json = serde_json::to_value(&advisory).unwrap();
        assert_eq!(json["kind"], "deprecated_version_used");
        assert_eq!(json["latest"], "2024-04-01");
    }
}
