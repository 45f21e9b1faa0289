//! # Migration Analysis
//!
//! Estimates what moving a resource from one API version to another costs.
//!
//! The breaking changes considered are those documented on every version
//! after `from` up to and including `to`, merged with changes derived by
//! diffing the two schemas. Moving to an older version documents nothing.
//!
//! ## Effort
//!
//! | Condition | Effort |
//! |-----------|--------|
//! | no changes | `Low` |
//! | any restructure, more than 3 removals or more than 3 type changes | `Breaking` |
//! | more than 1 removal, more than 1 type change, or more than 5 changes | `High` |
//! | more than 2 changes | `Medium` |
//! | otherwise | `Low` |

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use apiver_core::{ApiVersion, ResourceTypeId};
use apiver_schema::{diff_schemas, BreakingChange, BreakingChangeType, VersionDescriptor};

use crate::error::RegistryError;

/// Rough cost of a version migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationEffort {
    Low,
    Medium,
    High,
    Breaking,
}

impl MigrationEffort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Breaking => "breaking",
        }
    }
}

impl std::fmt::Display for MigrationEffort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`VersionRegistry::analyze_migration`](crate::VersionRegistry::analyze_migration).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationAnalysis {
    pub from_version: ApiVersion,
    pub to_version: ApiVersion,
    /// `true` when no breaking change applies.
    pub compatible: bool,
    pub breaking_changes: Vec<BreakingChange>,
    pub warnings: Vec<String>,
    pub effort: MigrationEffort,
    /// Whether the engine's own transform covers the migration, i.e. no
    /// property was removed, retyped or restructured.
    pub automatic_upgrade_possible: bool,
}

/// Analyze a migration over a version set sorted ascending.
///
/// `today` decides whether a sunset date has been reached; the sunset day
/// itself counts.
pub(crate) fn analyze(
    resource_type: &ResourceTypeId,
    descriptors: &[Arc<VersionDescriptor>],
    from: &ApiVersion,
    to: &ApiVersion,
    today: NaiveDate,
) -> Result<MigrationAnalysis, RegistryError> {
    let find = |version: &ApiVersion| {
        descriptors
            .iter()
            .position(|d| &d.version == version)
            .ok_or_else(|| RegistryError::VersionNotFound {
                resource_type: resource_type.clone(),
                version: version.clone(),
            })
    };
    let from_idx = find(from)?;
    let to_idx = find(to)?;
    let source = &descriptors[from_idx];
    let target = &descriptors[to_idx];

    if from_idx == to_idx {
        return Ok(MigrationAnalysis {
            from_version: from.clone(),
            to_version: to.clone(),
            compatible: true,
            breaking_changes: Vec::new(),
            warnings: Vec::new(),
            effort: MigrationEffort::Low,
            automatic_upgrade_possible: true,
        });
    }

    let mut changes: Vec<BreakingChange> = Vec::new();
    let mut seen: BTreeSet<(String, BreakingChangeType)> = BTreeSet::new();
    if from_idx < to_idx {
        for descriptor in &descriptors[from_idx + 1..=to_idx] {
            for change in &descriptor.breaking_changes {
                if seen.insert((change.property.clone(), change.change_type)) {
                    changes.push(change.clone());
                }
            }
        }
    }
    for change in diff_schemas(&source.schema, from, &target.schema, to) {
        if seen.insert((change.property.clone(), change.change_type)) {
            changes.push(change);
        }
    }

    let effort = estimate_effort(&changes);
    let automatic_upgrade_possible = !changes.iter().any(|c| blocks_automatic_upgrade(c.change_type));

    Ok(MigrationAnalysis {
        from_version: from.clone(),
        to_version: to.clone(),
        compatible: changes.is_empty(),
        warnings: warnings(source, target, today),
        breaking_changes: changes,
        effort,
        automatic_upgrade_possible,
    })
}

fn blocks_automatic_upgrade(change: BreakingChangeType) -> bool {
    matches!(
        change,
        BreakingChangeType::PropertyRemoved
            | BreakingChangeType::SchemaRestructured
            | BreakingChangeType::PropertyTypeChanged
    )
}

fn estimate_effort(changes: &[BreakingChange]) -> MigrationEffort {
    if changes.is_empty() {
        return MigrationEffort::Low;
    }
    let count = |ty: BreakingChangeType| changes.iter().filter(|c| c.change_type == ty).count();
    let removed = count(BreakingChangeType::PropertyRemoved);
    let retyped = count(BreakingChangeType::PropertyTypeChanged);
    let restructured = count(BreakingChangeType::SchemaRestructured);

    if restructured > 0 || removed > 3 || retyped > 3 {
        MigrationEffort::Breaking
    } else if removed > 1 || retyped > 1 || changes.len() > 5 {
        MigrationEffort::High
    } else if changes.len() > 2 {
        MigrationEffort::Medium
    } else {
        MigrationEffort::Low
    }
}

fn warnings(source: &VersionDescriptor, target: &VersionDescriptor, today: NaiveDate) -> Vec<String> {
    let mut warnings = Vec::new();
    if source.support_level.is_deprecated() {
        warnings.push(format!(
            "Source version '{}' is deprecated. Consider migrating to avoid future compatibility issues.",
            source.version
        ));
    }
    if target.support_level.is_deprecated() {
        warnings.push(format!(
            "Target version '{}' is deprecated. Consider using a newer version.",
            target.version
        ));
    }
    if let Some(sunset) = source.sunset_date.filter(|d| *d <= today) {
        warnings.push(format!(
            "Source version '{}' has reached sunset date ({sunset}). Immediate migration is required.",
            source.version
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiver_core::SupportLevel;
    use apiver_schema::{ApiSchema, PropertyDefinition};

    fn v(s: &str) -> ApiVersion {
        ApiVersion::new(s).unwrap()
    }

    fn ty() -> ResourceTypeId {
        ResourceTypeId::new("Microsoft.Storage/storageAccounts").unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn change(ty: BreakingChangeType, property: &str) -> BreakingChange {
        BreakingChange::new(ty, property, "documented")
    }

    fn schema() -> ApiSchema {
        ApiSchema::new()
            .property("location", PropertyDefinition::string().required())
            .property("tier", PropertyDefinition::string())
    }

    fn storage_versions() -> Vec<Arc<VersionDescriptor>> {
        vec![
            Arc::new(
                VersionDescriptor::new(v("2021-01-01"), SupportLevel::Deprecated, schema())
                    .with_sunset_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            ),
            Arc::new(
                VersionDescriptor::new(v("2023-05-01"), SupportLevel::Maintenance, schema())
                    .with_breaking_change(change(BreakingChangeType::PropertyRenamed, "kind")),
            ),
            Arc::new(
                VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, schema())
                    .with_breaking_change(change(BreakingChangeType::PropertyRequired, "sku")),
            ),
        ]
    }

    #[test]
    fn same_version_is_trivially_compatible() {
        let a = analyze(&ty(), &storage_versions(), &v("2023-05-01"), &v("2023-05-01"), today()).unwrap();
        assert!(a.compatible);
        assert!(a.automatic_upgrade_possible);
        assert_eq!(a.effort, MigrationEffort::Low);
        assert!(a.warnings.is_empty());
    }

    #[test]
    fn collects_declared_changes_in_range() {
        let a = analyze(&ty(), &storage_versions(), &v("2021-01-01"), &v("2024-01-01"), today()).unwrap();
        let props: Vec<_> = a.breaking_changes.iter().map(|c| c.property.as_str()).collect();
        assert_eq!(props, vec!["kind", "sku"]);
        assert!(!a.compatible);
        assert!(a.automatic_upgrade_possible);
        assert_eq!(a.effort, MigrationEffort::Low);
    }

    #[test]
    fn downgrade_documents_nothing() {
        let a = analyze(&ty(), &storage_versions(), &v("2024-01-01"), &v("2021-01-01"), today()).unwrap();
        assert!(a.breaking_changes.is_empty());
        assert!(a.compatible);
        assert_eq!(
            a.warnings,
            vec!["Target version '2021-01-01' is deprecated. Consider using a newer version.".to_string()]
        );
    }

    #[test]
    fn deprecated_and_sunset_source_warns() {
        let a = analyze(&ty(), &storage_versions(), &v("2021-01-01"), &v("2023-05-01"), today()).unwrap();
        assert_eq!(a.warnings.len(), 2);
        assert!(a.warnings[0].starts_with("Source version '2021-01-01' is deprecated."));
        assert!(a.warnings[1].contains("has reached sunset date (2024-01-01)"));

        let sunset_day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = analyze(&ty(), &storage_versions(), &v("2021-01-01"), &v("2023-05-01"), sunset_day).unwrap();
        assert_eq!(a.warnings.len(), 2);
        assert!(a.warnings[1].contains("has reached sunset date (2024-01-01)"));

        let before_sunset = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let a = analyze(&ty(), &storage_versions(), &v("2021-01-01"), &v("2023-05-01"), before_sunset).unwrap();
        assert_eq!(a.warnings.len(), 1);
    }

    #[test]
    fn derived_removal_blocks_automatic_upgrade() {
        let versions = vec![
            Arc::new(VersionDescriptor::new(v("2023-05-01"), SupportLevel::Active, schema())),
            Arc::new(VersionDescriptor::new(
                v("2024-01-01"),
                SupportLevel::Active,
                ApiSchema::new().property("location", PropertyDefinition::string().required()),
            )),
        ];
        let a = analyze(&ty(), &versions, &v("2023-05-01"), &v("2024-01-01"), today()).unwrap();
        assert_eq!(a.breaking_changes.len(), 1);
        assert_eq!(a.breaking_changes[0].change_type, BreakingChangeType::PropertyRemoved);
        assert_eq!(a.breaking_changes[0].property, "tier");
        assert!(!a.automatic_upgrade_possible);
        assert_eq!(a.effort, MigrationEffort::Low);
    }

    #[test]
    fn declared_and_derived_duplicates_collapse() {
        let versions = vec![
            Arc::new(VersionDescriptor::new(v("2023-05-01"), SupportLevel::Active, schema())),
            Arc::new(
                VersionDescriptor::new(
                    v("2024-01-01"),
                    SupportLevel::Active,
                    ApiSchema::new().property("location", PropertyDefinition::string().required()),
                )
                .with_breaking_change(change(BreakingChangeType::PropertyRemoved, "tier")),
            ),
        ];
        let a = analyze(&ty(), &versions, &v("2023-05-01"), &v("2024-01-01"), today()).unwrap();
        assert_eq!(a.breaking_changes.len(), 1);
        assert_eq!(a.breaking_changes[0].description, "documented");
    }

    #[test]
    fn unknown_version_is_not_found() {
        let err = analyze(&ty(), &storage_versions(), &v("2019-01-01"), &v("2024-01-01"), today()).unwrap_err();
        assert!(matches!(err, RegistryError::VersionNotFound { version, .. } if version.as_str() == "2019-01-01"));
    }

    #[test]
    fn effort_thresholds() {
        use BreakingChangeType::*;
        let of = |types: &[BreakingChangeType]| {
            let changes: Vec<_> = types
                .iter()
                .enumerate()
                .map(|(i, t)| change(*t, &format!("p{i}")))
                .collect();
            estimate_effort(&changes)
        };
        assert_eq!(of(&[]), MigrationEffort::Low);
        assert_eq!(of(&[PropertyRenamed, PropertyRenamed]), MigrationEffort::Low);
        assert_eq!(of(&[PropertyRenamed; 3]), MigrationEffort::Medium);
        assert_eq!(of(&[PropertyRemoved, PropertyRemoved]), MigrationEffort::High);
        assert_eq!(of(&[PropertyRequired; 6]), MigrationEffort::High);
        assert_eq!(of(&[PropertyTypeChanged; 4]), MigrationEffort::Breaking);
        assert_eq!(of(&[SchemaRestructured]), MigrationEffort::Breaking);
    }
}
