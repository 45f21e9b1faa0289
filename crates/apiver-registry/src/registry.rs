//! # The Version Registry
//!
//! An explicit, shareable store of registered version sets. The root of a
//! construction graph owns one `VersionRegistry` and lends it to every
//! constructor; nothing here is global.
//!
//! ## Concurrency
//!
//! Entries live behind a `parking_lot::RwLock`. Registration takes the write
//! lock for the whole `Unregistered → Registering → Registered` sequence,
//! which makes the per-type registration a compare-and-set. Registered sets
//! are immutable and handed out as `Arc`s, so reads never block on each
//! other and never observe a partial set.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use apiver_core::{
    sha256_digest, ApiVersion, CanonicalBytes, ContentDigest, ResourceTypeId, SupportLevel, Timestamp,
};
use apiver_schema::{check_well_formed, ApiSchema, VersionDescriptor};
use apiver_state::{RegistrationState, TypeRegistration};

use crate::config::{ConflictPolicy, RegistryConfig};
use crate::error::{RegistryError, VersionSetProblem};
use crate::lifecycle::{VersionConstraints, VersionLifecycle};
use crate::migration::{self, MigrationAnalysis};
use crate::resolution::{Advisory, ResolutionSource, VersionResolution};

// ─── Registered Sets ─────────────────────────────────────────────────

/// The immutable version set of one registered resource type.
#[derive(Debug)]
pub struct RegisteredType {
    pub resource_type: ResourceTypeId,
    /// Sorted oldest first.
    descriptors: Vec<Arc<VersionDescriptor>>,
    /// Index of the version [`latest`](Self::latest) returns.
    latest: usize,
    fingerprint: ContentDigest,
    registered_at: Timestamp,
}

impl RegisteredType {
    /// Descriptors, oldest first.
    pub fn descriptors(&self) -> &[Arc<VersionDescriptor>] {
        &self.descriptors
    }

    pub fn descriptor(&self, version: &ApiVersion) -> Option<&Arc<VersionDescriptor>> {
        self.descriptors
            .binary_search_by(|d| d.version.cmp(version))
            .ok()
            .map(|i| &self.descriptors[i])
    }

    /// Versions, newest first.
    pub fn versions(&self) -> Vec<ApiVersion> {
        self.descriptors.iter().rev().map(|d| d.version.clone()).collect()
    }

    /// The newest `Active` version, or the newest version when none is active.
    pub fn latest(&self) -> &VersionDescriptor {
        &self.descriptors[self.latest]
    }

    /// Digest of the canonical version set.
    pub fn fingerprint(&self) -> &ContentDigest {
        &self.fingerprint
    }

    pub fn registered_at(&self) -> &Timestamp {
        &self.registered_at
    }
}

/// What a registration call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The set was stored.
    Registered { version_count: usize },
    /// An identical set was already registered; nothing changed.
    AlreadyRegistered,
    /// A different set was offered and ignored under `keep_existing`.
    KeptExisting {
        existing: ContentDigest,
        incoming: ContentDigest,
    },
}

#[derive(Debug)]
struct TypeEntry {
    registration: TypeRegistration,
    versions: Option<Arc<RegisteredType>>,
}

// ─── Registry ────────────────────────────────────────────────────────

/// Registered version sets, keyed by resource type.
#[derive(Debug, Default)]
pub struct VersionRegistry {
    config: RegistryConfig,
    entries: RwLock<BTreeMap<ResourceTypeId, TypeEntry>>,
}

impl VersionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Register the version set of `resource_type`.
    ///
    /// The list must be non-empty, free of duplicate versions, and every
    /// schema must be well-formed. Registering an identical set again is an
    /// advisory no-op. A different set is refused or ignored according to
    /// the configured [`ConflictPolicy`].
    pub fn register_resource_type(
        &self,
        resource_type: &ResourceTypeId,
        versions: Vec<VersionDescriptor>,
    ) -> Result<RegistrationOutcome, RegistryError> {
        let problems = check_version_set(&versions);
        let prepared = if problems.is_empty() {
            Some(prepare(versions)?)
        } else {
            None
        };

        let mut entries = self.entries.write();
        let entry = entries
            .entry(resource_type.clone())
            .or_insert_with(|| TypeEntry {
                registration: TypeRegistration::new(resource_type.clone()),
                versions: None,
            });

        if let Some(existing) = &entry.versions {
            let Some((_, incoming)) = prepared else {
                return Err(RegistryError::InvalidVersionSet {
                    resource_type: resource_type.clone(),
                    problems,
                });
            };
            return self.reconcile(existing, incoming);
        }

        entry.registration.begin()?;
        let Some((descriptors, fingerprint)) = prepared else {
            entry
                .registration
                .abort(format!("{} problem(s) in version set", problems.len()))?;
            tracing::warn!(
                resource_type = %resource_type,
                problems = problems.len(),
                "version set rejected"
            );
            return Err(RegistryError::InvalidVersionSet {
                resource_type: resource_type.clone(),
                problems,
            });
        };
        entry.registration.complete(fingerprint)?;

        let version_count = descriptors.len();
        let latest = descriptors
            .iter()
            .rposition(|d| d.support_level == SupportLevel::Active)
            .unwrap_or(version_count.saturating_sub(1));
        tracing::info!(
            resource_type = %resource_type,
            versions = version_count,
            fingerprint = %fingerprint,
            "resource type registered"
        );
        entry.versions = Some(Arc::new(RegisteredType {
            resource_type: resource_type.clone(),
            descriptors,
            latest,
            fingerprint,
            registered_at: Timestamp::now(),
        }));
        Ok(RegistrationOutcome::Registered { version_count })
    }

    fn reconcile(
        &self,
        existing: &RegisteredType,
        incoming: ContentDigest,
    ) -> Result<RegistrationOutcome, RegistryError> {
        if existing.fingerprint == incoming {
            tracing::debug!(
                resource_type = %existing.resource_type,
                "identical version set already registered"
            );
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        match self.config.conflict_policy {
            ConflictPolicy::Reject => Err(RegistryError::ConflictingVersionSet {
                resource_type: existing.resource_type.clone(),
                existing: existing.fingerprint,
                incoming,
            }),
            ConflictPolicy::KeepExisting => {
                tracing::warn!(
                    resource_type = %existing.resource_type,
                    existing = %existing.fingerprint,
                    incoming = %incoming,
                    "different version set offered for registered type; keeping the first"
                );
                Ok(RegistrationOutcome::KeptExisting {
                    existing: existing.fingerprint,
                    incoming,
                })
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_registered(&self, resource_type: &ResourceTypeId) -> bool {
        self.entries
            .read()
            .get(resource_type)
            .is_some_and(|e| e.versions.is_some())
    }

    pub fn registration_state(&self, resource_type: &ResourceTypeId) -> RegistrationState {
        self.entries
            .read()
            .get(resource_type)
            .map_or(RegistrationState::Unregistered, |e| e.registration.state())
    }

    /// Registered types in sorted order.
    pub fn registered_resource_types(&self) -> Vec<ResourceTypeId> {
        self.entries
            .read()
            .iter()
            .filter(|(_, e)| e.versions.is_some())
            .map(|(t, _)| t.clone())
            .collect()
    }

    /// The registered set of `resource_type`.
    pub fn registered_type(&self, resource_type: &ResourceTypeId) -> Result<Arc<RegisteredType>, RegistryError> {
        self.entries
            .read()
            .get(resource_type)
            .and_then(|e| e.versions.clone())
            .ok_or_else(|| RegistryError::ResourceTypeNotRegistered {
                resource_type: resource_type.clone(),
            })
    }

    /// Supported versions, newest first.
    pub fn supported_versions(&self, resource_type: &ResourceTypeId) -> Result<Vec<ApiVersion>, RegistryError> {
        Ok(self.registered_type(resource_type)?.versions())
    }

    /// The newest `Active` version, falling back to the newest overall.
    pub fn latest_version(&self, resource_type: &ResourceTypeId) -> Result<ApiVersion, RegistryError> {
        Ok(self.registered_type(resource_type)?.latest().version.clone())
    }

    pub fn version_descriptor(
        &self,
        resource_type: &ResourceTypeId,
        version: &ApiVersion,
    ) -> Result<Arc<VersionDescriptor>, RegistryError> {
        self.registered_type(resource_type)?
            .descriptor(version)
            .cloned()
            .ok_or_else(|| RegistryError::VersionNotFound {
                resource_type: resource_type.clone(),
                version: version.clone(),
            })
    }

    pub fn get_schema(
        &self,
        resource_type: &ResourceTypeId,
        version: &ApiVersion,
    ) -> Result<Arc<ApiSchema>, RegistryError> {
        Ok(Arc::clone(&self.version_descriptor(resource_type, version)?.schema))
    }

    /// Whether `version` is registered for `resource_type`.
    pub fn validate_version_support(&self, resource_type: &ResourceTypeId, version: &ApiVersion) -> bool {
        self.version_descriptor(resource_type, version).is_ok()
    }

    pub fn version_lifecycle(
        &self,
        resource_type: &ResourceTypeId,
        version: &ApiVersion,
    ) -> Result<VersionLifecycle, RegistryError> {
        let d = self.version_descriptor(resource_type, version)?;
        Ok(VersionLifecycle {
            version: d.version.clone(),
            phase: d.support_level,
            next_phase: d.support_level.next_phase(),
            sunset_date: d.sunset_date,
        })
    }

    /// The newest version satisfying `constraints`, if any.
    pub fn find_version(
        &self,
        resource_type: &ResourceTypeId,
        constraints: &VersionConstraints,
    ) -> Result<Option<ApiVersion>, RegistryError> {
        Ok(self
            .registered_type(resource_type)?
            .descriptors()
            .iter()
            .rev()
            .find(|d| constraints.admits(&d.version, d.support_level))
            .map(|d| d.version.clone()))
    }

    // ── Resolution ───────────────────────────────────────────────────

    /// Pick the version for one instance: `explicit` when given, otherwise
    /// the resource type's `default`.
    ///
    /// Either must be registered. A deprecated version, or one past its
    /// sunset date (the sunset day included), resolves with an advisory.
    pub fn resolve_version(
        &self,
        resource_type: &ResourceTypeId,
        explicit: Option<&ApiVersion>,
        default: &ApiVersion,
    ) -> Result<VersionResolution, RegistryError> {
        let registered = self.registered_type(resource_type)?;
        let (version, source) = match explicit {
            Some(v) => (v, ResolutionSource::Explicit),
            None => (default, ResolutionSource::Default),
        };
        let Some(descriptor) = registered.descriptor(version) else {
            return Err(RegistryError::UnknownApiVersion {
                resource_type: resource_type.clone(),
                version: version.clone(),
                supported: registered.versions(),
            });
        };

        let mut advisories = Vec::new();
        if descriptor.support_level.is_deprecated() {
            let latest = registered.latest().version.clone();
            tracing::warn!(
                resource_type = %resource_type,
                version = %version,
                latest = %latest,
                "deprecated api version used"
            );
            advisories.push(Advisory::DeprecatedVersionUsed {
                resource_type: resource_type.clone(),
                version: version.clone(),
                latest,
            });
        }
        if let Some(sunset_date) = descriptor.sunset_date.filter(|d| *d <= today()) {
            tracing::warn!(
                resource_type = %resource_type,
                version = %version,
                sunset = %sunset_date,
                "api version past its sunset date"
            );
            advisories.push(Advisory::SunsetPassed {
                resource_type: resource_type.clone(),
                version: version.clone(),
                sunset_date,
            });
        }

        tracing::debug!(
            resource_type = %resource_type,
            version = %version,
            source = ?source,
            "api version resolved"
        );
        Ok(VersionResolution {
            version: version.clone(),
            support_level: descriptor.support_level,
            source,
            advisories,
        })
    }

    /// Estimate the cost of moving `resource_type` from one version to another.
    pub fn analyze_migration(
        &self,
        resource_type: &ResourceTypeId,
        from: &ApiVersion,
        to: &ApiVersion,
    ) -> Result<MigrationAnalysis, RegistryError> {
        let registered = self.registered_type(resource_type)?;
        migration::analyze(resource_type, registered.descriptors(), from, to, today())
    }
}

fn today() -> chrono::NaiveDate {
    Timestamp::now().as_datetime().date_naive()
}

/// Structural checks on a version list offered for registration.
fn check_version_set(versions: &[VersionDescriptor]) -> Vec<VersionSetProblem> {
    if versions.is_empty() {
        return vec![VersionSetProblem::Empty];
    }
    let mut problems = Vec::new();
    let mut known = BTreeSet::new();
    let mut reported = BTreeSet::new();
    for d in versions {
        if !known.insert(d.version.clone()) && reported.insert(d.version.clone()) {
            problems.push(VersionSetProblem::DuplicateVersion(d.version.clone()));
        }
    }
    for d in versions {
        let defects = check_well_formed(&d.schema, &d.version, &known);
        if !defects.is_empty() {
            problems.push(VersionSetProblem::MalformedSchema {
                version: d.version.clone(),
                defects,
            });
        }
    }
    problems
}

/// Sort a validated list and compute its fingerprint.
fn prepare(mut versions: Vec<VersionDescriptor>) -> Result<(Vec<Arc<VersionDescriptor>>, ContentDigest), RegistryError> {
    versions.sort_by(|a, b| a.version.cmp(&b.version));
    let fingerprint = sha256_digest(&CanonicalBytes::new(&versions)?);
    Ok((versions.into_iter().map(Arc::new).collect(), fingerprint))
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiver_schema::{PropertyDefinition, SchemaDefect};
    use chrono::NaiveDate;

    fn v(s: &str) -> ApiVersion {
        ApiVersion::new(s).unwrap()
    }

    fn storage() -> ResourceTypeId {
        ResourceTypeId::new("Microsoft.Storage/storageAccounts").unwrap()
    }

    fn schema() -> ApiSchema {
        ApiSchema::new()
            .property("location", PropertyDefinition::string().required())
            .property(
                "accountType",
                PropertyDefinition::string().renamed_in(v("2024-01-01"), "sku.name"),
            )
    }

    fn plain() -> ApiSchema {
        ApiSchema::new().property("location", PropertyDefinition::string().required())
    }

    fn versions() -> Vec<VersionDescriptor> {
        vec![
            VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, schema()),
            VersionDescriptor::new(v("2021-01-01"), SupportLevel::Deprecated, schema()),
            VersionDescriptor::new(v("2023-05-01"), SupportLevel::Maintenance, schema()),
            VersionDescriptor::new(v("2024-06-01-preview"), SupportLevel::Preview, schema()),
        ]
    }

    fn registry() -> VersionRegistry {
        let r = VersionRegistry::default();
        r.register_resource_type(&storage(), versions()).unwrap();
        r
    }

    #[test]
    fn registers_and_sorts() {
        let r = VersionRegistry::default();
        let outcome = r.register_resource_type(&storage(), versions()).unwrap();
        assert_eq!(outcome, RegistrationOutcome::Registered { version_count: 4 });
        assert!(r.is_registered(&storage()));
        assert_eq!(r.registration_state(&storage()), RegistrationState::Registered);
        let supported: Vec<String> = r
            .supported_versions(&storage())
            .unwrap()
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(
            supported,
            vec!["2024-06-01-preview", "2024-01-01", "2023-05-01", "2021-01-01"]
        );
    }

    #[test]
    fn identical_repeat_is_a_no_op() {
        let r = registry();
        let mut shuffled = versions();
        shuffled.reverse();
        let outcome = r.register_resource_type(&storage(), shuffled).unwrap();
        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(r.supported_versions(&storage()).unwrap().len(), 4);
    }

    #[test]
    fn different_set_is_rejected_by_default() {
        let r = registry();
        let mut changed = versions();
        changed.pop();
        let err = r.register_resource_type(&storage(), changed).unwrap_err();
        assert!(matches!(err, RegistryError::ConflictingVersionSet { .. }));
        assert_eq!(r.supported_versions(&storage()).unwrap().len(), 4);
    }

    #[test]
    fn keep_existing_ignores_different_set() {
        let r = VersionRegistry::new(
            RegistryConfig::default().with_conflict_policy(ConflictPolicy::KeepExisting),
        );
        r.register_resource_type(&storage(), versions()).unwrap();
        let outcome = r
            .register_resource_type(&storage(), versions()[..1].to_vec())
            .unwrap();
        assert!(matches!(outcome, RegistrationOutcome::KeptExisting { .. }));
        assert_eq!(r.supported_versions(&storage()).unwrap().len(), 4);
    }

    #[test]
    fn empty_set_is_invalid_and_leaves_type_unregistered() {
        let r = VersionRegistry::default();
        let err = r.register_resource_type(&storage(), Vec::new()).unwrap_err();
        match err {
            RegistryError::InvalidVersionSet { problems, .. } => {
                assert_eq!(problems, vec![VersionSetProblem::Empty]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(r.registration_state(&storage()), RegistrationState::Unregistered);
        assert!(r.registered_resource_types().is_empty());
        r.register_resource_type(&storage(), versions()).unwrap();
    }

    #[test]
    fn duplicates_and_malformed_schemas_are_reported() {
        let r = VersionRegistry::default();
        let broken = ApiSchema::new().property("tier", PropertyDefinition::enumeration(Vec::<String>::new()));
        let list = vec![
            VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, schema()),
            VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, schema()),
            VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, schema()),
            VersionDescriptor::new(v("2023-01-01"), SupportLevel::Active, broken),
        ];
        let err = r.register_resource_type(&storage(), list).unwrap_err();
        let RegistryError::InvalidVersionSet { problems, .. } = err else {
            panic!("expected InvalidVersionSet");
        };
        assert_eq!(
            problems,
            vec![
                VersionSetProblem::DuplicateVersion(v("2024-01-01")),
                VersionSetProblem::MalformedSchema {
                    version: v("2023-01-01"),
                    defects: vec![SchemaDefect::EmptyEnum { path: "tier".into() }],
                },
            ]
        );
    }

    #[test]
    fn invalid_repeat_of_registered_type_is_still_invalid() {
        let r = registry();
        let err = r.register_resource_type(&storage(), Vec::new()).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidVersionSet { .. }));
    }

    #[test]
    fn every_offer_is_checked_against_the_stored_set() {
        let r = registry();
        assert_eq!(
            r.register_resource_type(&storage(), versions()).unwrap(),
            RegistrationOutcome::AlreadyRegistered
        );
        let mut fewer = versions();
        fewer.pop();
        assert!(matches!(
            r.register_resource_type(&storage(), fewer),
            Err(RegistryError::ConflictingVersionSet { .. })
        ));
    }

    #[test]
    fn resolve_explicit_and_default() {
        let r = registry();
        let explicit = r
            .resolve_version(&storage(), Some(&v("2023-05-01")), &v("2024-01-01"))
            .unwrap();
        assert_eq!(explicit.version, v("2023-05-01"));
        assert_eq!(explicit.source, ResolutionSource::Explicit);
        assert!(explicit.advisories.is_empty());

        let default = r.resolve_version(&storage(), None, &v("2024-01-01")).unwrap();
        assert_eq!(default.version, v("2024-01-01"));
        assert_eq!(default.source, ResolutionSource::Default);
    }

    #[test]
    fn resolve_unknown_version_fails() {
        let r = registry();
        let err = r
            .resolve_version(&storage(), Some(&v("2019-01-01")), &v("2024-01-01"))
            .unwrap_err();
        match err {
            RegistryError::UnknownApiVersion { version, supported, .. } => {
                assert_eq!(version, v("2019-01-01"));
                assert_eq!(supported.len(), 4);
            }
            other => panic!("unexpected error: {other}"),
        }
        let err = r.resolve_version(&storage(), None, &v("2019-01-01")).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownApiVersion { .. }));
    }

    #[test]
    fn resolve_deprecated_raises_advisory() {
        let r = registry();
        let res = r
            .resolve_version(&storage(), Some(&v("2021-01-01")), &v("2024-01-01"))
            .unwrap();
        assert!(res.is_deprecated());
        assert_eq!(
            res.advisories,
            vec![Advisory::DeprecatedVersionUsed {
                resource_type: storage(),
                version: v("2021-01-01"),
                latest: v("2024-01-01"),
            }]
        );
    }

    #[test]
    fn resolve_past_sunset_raises_advisory() {
        let r = VersionRegistry::default();
        let ty = ResourceTypeId::new("Microsoft.Web/sites").unwrap();
        r.register_resource_type(
            &ty,
            vec![VersionDescriptor::new(v("2019-08-01"), SupportLevel::Maintenance, plain())
                .with_sunset_date(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap())],
        )
        .unwrap();
        let res = r.resolve_version(&ty, None, &v("2019-08-01")).unwrap();
        assert!(matches!(res.advisories[..], [Advisory::SunsetPassed { .. }]));
    }

    #[test]
    fn sunset_day_itself_raises_advisory() {
        let r = VersionRegistry::default();
        let ty = ResourceTypeId::new("Microsoft.Web/sites").unwrap();
        let sunset = today();
        r.register_resource_type(
            &ty,
            vec![VersionDescriptor::new(v("2019-08-01"), SupportLevel::Active, plain()).with_sunset_date(sunset)],
        )
        .unwrap();
        let res = r.resolve_version(&ty, None, &v("2019-08-01")).unwrap();
        assert_eq!(
            res.advisories,
            vec![Advisory::SunsetPassed {
                resource_type: ty.clone(),
                version: v("2019-08-01"),
                sunset_date: sunset,
            }]
        );
    }

    #[test]
    fn unregistered_type_queries_fail() {
        let r = VersionRegistry::default();
        assert!(matches!(
            r.get_schema(&storage(), &v("2024-01-01")),
            Err(RegistryError::ResourceTypeNotRegistered { .. })
        ));
        assert!(matches!(
            r.resolve_version(&storage(), None, &v("2024-01-01")),
            Err(RegistryError::ResourceTypeNotRegistered { .. })
        ));
        assert!(!r.validate_version_support(&storage(), &v("2024-01-01")));
    }

    #[test]
    fn get_schema_and_lookups() {
        let r = registry();
        let schema = r.get_schema(&storage(), &v("2024-01-01")).unwrap();
        assert!(schema.get("accountType").is_some());
        assert!(matches!(
            r.get_schema(&storage(), &v("2022-01-01")),
            Err(RegistryError::VersionNotFound { .. })
        ));
        assert!(r.validate_version_support(&storage(), &v("2023-05-01")));
        assert_eq!(r.latest_version(&storage()).unwrap(), v("2024-01-01"));
    }

    #[test]
    fn latest_falls_back_to_newest_overall() {
        let r = VersionRegistry::default();
        r.register_resource_type(
            &storage(),
            vec![
                VersionDescriptor::new(v("2020-01-01"), SupportLevel::Deprecated, plain()),
                VersionDescriptor::new(v("2021-01-01"), SupportLevel::Maintenance, plain()),
            ],
        )
        .unwrap();
        assert_eq!(r.latest_version(&storage()).unwrap(), v("2021-01-01"));
    }

    #[test]
    fn lifecycle_and_constraints() {
        let r = registry();
        let lc = r.version_lifecycle(&storage(), &v("2023-05-01")).unwrap();
        assert_eq!(lc.phase, SupportLevel::Maintenance);
        assert_eq!(lc.next_phase, Some(SupportLevel::Deprecated));

        let newest = r.find_version(&storage(), &VersionConstraints::default()).unwrap();
        assert_eq!(newest, Some(v("2024-06-01-preview")));
        let maintained = r
            .find_version(
                &storage(),
                &VersionConstraints::default().with_support_level(SupportLevel::Maintenance),
            )
            .unwrap();
        assert_eq!(maintained, Some(v("2023-05-01")));
        let deprecated = r
            .find_version(
                &storage(),
                &VersionConstraints::default().with_support_level(SupportLevel::Deprecated),
            )
            .unwrap();
        assert_eq!(deprecated, None);
    }

    #[test]
    fn migration_through_registry() {
        let r = registry();
        let analysis = r
            .analyze_migration(&storage(), &v("2021-01-01"), &v("2024-01-01"))
            .unwrap();
        assert_eq!(analysis.breaking_changes.len(), 1);
        assert_eq!(
            analysis.breaking_changes[0].change_type,
            apiver_schema::BreakingChangeType::PropertyRenamed
        );
        assert!(analysis.automatic_upgrade_possible);
        assert_eq!(analysis.warnings.len(), 1);
    }

    #[test]
    fn registered_types_are_sorted() {
        let r = registry();
        let rg = ResourceTypeId::new("Microsoft.Resources/resourceGroups").unwrap();
        r.register_resource_type(&rg, versions()).unwrap();
        assert_eq!(r.registered_resource_types(), vec![rg, storage()]);
    }

    #[test]
    fn concurrent_registration_stores_one_set() {
        let r = Arc::new(VersionRegistry::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let r = Arc::clone(&r);
                std::thread::spawn(move || r.register_resource_type(&storage(), versions()).unwrap())
            })
            .collect();
        let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let stored = outcomes
            .iter()
            .filter(|o| matches!(o, RegistrationOutcome::Registered { .. }))
            .count();
        assert_eq!(stored, 1);
        assert_eq!(r.supported_versions(&storage()).unwrap().len(), 4);
    }
}
