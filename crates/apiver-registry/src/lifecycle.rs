//! # Version Lifecycle Queries

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use apiver_core::{ApiVersion, SupportLevel};

/// Where one version sits in the support lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionLifecycle {
    pub version: ApiVersion,
    pub phase: SupportLevel,
    /// The stage the version moves to next, `None` once deprecated.
    pub next_phase: Option<SupportLevel>,
    pub sunset_date: Option<NaiveDate>,
}

/// Filters for picking a version without naming one.
///
/// Deprecated versions are excluded unless `include_deprecated` is set, even
/// when `support_level` asks for `deprecated`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VersionConstraints {
    pub support_level: Option<SupportLevel>,
    /// Skip versions released before this date.
    pub not_older_than: Option<NaiveDate>,
    pub include_deprecated: bool,
}

impl VersionConstraints {
    pub fn with_support_level(mut self, level: SupportLevel) -> Self {
        self.support_level = Some(level);
        self
    }

    pub fn not_older_than(mut self, date: NaiveDate) -> Self {
        self.not_older_than = Some(date);
        self
    }

    pub fn include_deprecated(mut self) -> Self {
        self.include_deprecated = true;
        self
    }

    /// Whether a version at `level` satisfies the constraints.
    pub fn admits(&self, version: &ApiVersion, level: SupportLevel) -> bool {
        if self.support_level.is_some_and(|wanted| wanted != level) {
            return false;
        }
        if level.is_deprecated() && !self.include_deprecated {
            return false;
        }
        match self.not_older_than {
            Some(date) => version.date() >= date,
            None => true,
        }
    }
}
