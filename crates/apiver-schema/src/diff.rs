//! # Schema Diff
//!
//! Derives breaking changes by comparing the schemas of two versions,
//! property by logical path. Complements the changes a provider documents
//! on its descriptors.

use std::collections::BTreeMap;

use apiver_core::ApiVersion;

use crate::descriptor::{BreakingChange, BreakingChangeType};
use crate::model::{ApiSchema, PropertyDefinition, PropertyType};
use crate::rename::{join, RenameTable};

/// Breaking changes observed going from `from` (under `from_version`) to
/// `to` (under `to_version`), ordered by logical path.
pub fn diff_schemas(
    from: &ApiSchema,
    from_version: &ApiVersion,
    to: &ApiSchema,
    to_version: &ApiVersion,
) -> Vec<BreakingChange> {
    let old = flatten(from);
    let new = flatten(to);
    let old_wire = RenameTable::build(from, from_version);
    let new_wire = RenameTable::build(to, to_version);
    let mut changes = Vec::new();

    for (path, old_def) in &old {
        let Some(new_def) = new.get(path) else {
            changes.push(BreakingChange::new(
                BreakingChangeType::PropertyRemoved,
                path.clone(),
                format!("`{path}` is not accepted by {to_version}"),
            ));
            continue;
        };

        let old_type = shallow_type(&old_def.property_type);
        let new_type = shallow_type(&new_def.property_type);
        if old_type != new_type {
            changes.push(BreakingChange::new(
                BreakingChangeType::PropertyTypeChanged,
                path.clone(),
                format!("`{path}` changed from {old_type} to {new_type}"),
            ));
        } else if let (PropertyType::Enum(before), PropertyType::Enum(after)) =
            (&old_def.property_type, &new_def.property_type)
        {
            let dropped: Vec<&str> = before
                .iter()
                .filter(|v| !after.contains(*v))
                .map(String::as_str)
                .collect();
            if !dropped.is_empty() {
                changes.push(BreakingChange::new(
                    BreakingChangeType::PropertyTypeChanged,
                    path.clone(),
                    format!("`{path}` no longer accepts {}", dropped.join(", ")),
                ));
            }
        }

        if let (Some(a), Some(b)) = (old_wire.wire_path(path), new_wire.wire_path(path)) {
            if a != b {
                changes.push(
                    BreakingChange::new(
                        BreakingChangeType::PropertyRenamed,
                        path.clone(),
                        format!("wire field `{a}` became `{b}`"),
                    )
                    .with_migration_path("handled by transform; no caller change needed"),
                );
            }
        }

        if !old_def.required && new_def.required && new_def.default.is_none() {
            changes.push(BreakingChange::new(
                BreakingChangeType::PropertyRequired,
                path.clone(),
                format!("`{path}` is now required"),
            ));
        }
    }

    for (path, new_def) in &new {
        if !old.contains_key(path) && new_def.required && new_def.default.is_none() {
            changes.push(BreakingChange::new(
                BreakingChangeType::PropertyRequired,
                path.clone(),
                format!("`{path}` is new and required"),
            ));
        }
    }

    changes.sort_by(|a, b| a.property.cmp(&b.property).then(a.change_type.cmp(&b.change_type)));
    changes
}

/// Every property definition keyed by logical path.
fn flatten(schema: &ApiSchema) -> BTreeMap<String, &PropertyDefinition> {
    let mut out = BTreeMap::new();
    flatten_into(schema, "", &mut out);
    out
}

fn flatten_into<'a>(schema: &'a ApiSchema, prefix: &str, out: &mut BTreeMap<String, &'a PropertyDefinition>) {
    for (name, def) in &schema.properties {
        let path = join(prefix, name);
        let mut ty = &def.property_type;
        let mut nested_prefix = path.clone();
        while let PropertyType::Array(items) = ty {
            ty = &**items;
            nested_prefix.push_str("[]");
        }
        if let PropertyType::Object(nested) = ty {
            flatten_into(nested, &nested_prefix, out);
        }
        out.insert(path, def);
    }
}

/// Type name ignoring nested object contents and enum members.
fn shallow_type(ty: &PropertyType) -> String {
    match ty {
        PropertyType::Scalar(kind) => kind.as_str().to_string(),
        PropertyType::Object(_) => "object".to_string(),
        PropertyType::Array(items) => format!("array<{}>", shallow_type(items)),
        PropertyType::Enum(_) => "enum".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PropertyDefinition as P;

    fn v(s: &str) -> ApiVersion {
        ApiVersion::new(s).unwrap()
    }

    fn kinds(changes: &[BreakingChange]) -> Vec<(String, BreakingChangeType)> {
        changes
            .iter()
            .map(|c| (c.property.clone(), c.change_type))
            .collect()
    }

    #[test]
    fn identical_schemas_have_no_changes() {
        let s = ApiSchema::new().property("location", P::string().required());
        assert!(diff_schemas(&s, &v("2023-05-01"), &s, &v("2024-01-01")).is_empty());
    }

    #[test]
    fn version_rename_is_detected() {
        let s = ApiSchema::new().property(
            "accountType",
            P::string().renamed_in(v("2024-01-01"), "sku.name"),
        );
        let changes = diff_schemas(&s, &v("2023-05-01"), &s, &v("2024-01-01"));
        assert_eq!(
            kinds(&changes),
            [("accountType".to_string(), BreakingChangeType::PropertyRenamed)]
        );
        assert_eq!(changes[0].description, "wire field `accountType` became `sku.name`");
    }

    #[test]
    fn removed_retyped_and_required() {
        let from = ApiSchema::new()
            .property("a", P::string())
            .property("b", P::string())
            .property("c", P::string())
            .property("tier", P::enumeration(["Hot", "Cool", "Archive"]));
        let to = ApiSchema::new()
            .property("b", P::integer())
            .property("c", P::string().required())
            .property("d", P::boolean().required())
            .property("tier", P::enumeration(["Hot", "Cool"]));
        let changes = diff_schemas(&from, &v("2023-05-01"), &to, &v("2024-01-01"));
        assert_eq!(
            kinds(&changes),
            [
                ("a".to_string(), BreakingChangeType::PropertyRemoved),
                ("b".to_string(), BreakingChangeType::PropertyTypeChanged),
                ("c".to_string(), BreakingChangeType::PropertyRequired),
                ("d".to_string(), BreakingChangeType::PropertyRequired),
                ("tier".to_string(), BreakingChangeType::PropertyTypeChanged),
            ]
        );
    }

    #[test]
    fn new_required_with_default_is_not_breaking() {
        let from = ApiSchema::new();
        let to = ApiSchema::new().property(
            "tags",
            P::any().required().with_default(serde_json::json!({})),
        );
        assert!(diff_schemas(&from, &v("2023-05-01"), &to, &v("2024-01-01")).is_empty());
    }

    #[test]
    fn nested_paths_are_compared() {
        let from = ApiSchema::new().property(
            "rules",
            P::array(PropertyType::Object(ApiSchema::new().property("port", P::integer()))),
        );
        let to = ApiSchema::new().property(
            "rules",
            P::array(PropertyType::Object(ApiSchema::new().property("port", P::string()))),
        );
        let changes = diff_schemas(&from, &v("2023-05-01"), &to, &v("2024-01-01"));
        assert_eq!(
            kinds(&changes),
            [("rules[].port".to_string(), BreakingChangeType::PropertyTypeChanged)]
        );
    }
}
