//! # Per-Version Rename Table
//!
//! A pure `logicalPath → wirePath` mapping for one (schema, version) pair.
//! `transform` consults it to place each property; migration analysis diffs
//! two tables to find renamed fields.
//!
//! Logical paths use dotted keys with `[]` marking array items
//! (`ipConfigurations[].subnet.id`). Wire paths use the same notation on
//! the wire side.

use std::collections::BTreeMap;

use apiver_core::ApiVersion;

use crate::model::{ApiSchema, PropertyType};

/// Where one logical property lands on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireEntry {
    /// Dotted path relative to the enclosing wire object (`sku.name`).
    pub relative: String,
    /// Full path from the wire body root.
    pub full: String,
}

impl WireEntry {
    /// The relative path split into object keys.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.relative.split('.')
    }
}

/// The complete rename table for one schema under one version.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameTable {
    entries: BTreeMap<String, WireEntry>,
}

impl RenameTable {
    /// Build the table for `schema` as used under `version`.
    pub fn build(schema: &ApiSchema, version: &ApiVersion) -> Self {
        let mut table = Self::default();
        table.collect(schema, version, "", "");
        table
    }

    fn collect(&mut self, schema: &ApiSchema, version: &ApiVersion, logical: &str, wire: &str) {
        for (name, def) in &schema.properties {
            let relative = def.wire_path_for(name, version);
            let logical_path = join(logical, name);
            let wire_path = join(wire, relative);
            self.descend(&def.property_type, version, &logical_path, &wire_path);
            self.entries.insert(
                logical_path,
                WireEntry {
                    relative: relative.to_string(),
                    full: wire_path,
                },
            );
        }
    }

    fn descend(&mut self, ty: &PropertyType, version: &ApiVersion, logical: &str, wire: &str) {
        match ty {
            PropertyType::Object(nested) => self.collect(nested, version, logical, wire),
            PropertyType::Array(items) => {
                self.descend(items, version, &format!("{logical}[]"), &format!("{wire}[]"))
            }
            PropertyType::Scalar(_) | PropertyType::Enum(_) => {}
        }
    }

    /// Look up the wire placement of a logical path.
    pub fn get(&self, logical: &str) -> Option<&WireEntry> {
        self.entries.get(logical)
    }

    /// Full wire path for a logical path.
    pub fn wire_path(&self, logical: &str) -> Option<&str> {
        self.entries.get(logical).map(|e| e.full.as_str())
    }

    /// All entries in logical path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &WireEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose wire path differs from their logical path.
    pub fn renamed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter(|(logical, entry)| logical.as_str() != entry.full)
            .map(|(logical, entry)| (logical.as_str(), entry.full.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join a parent path and a child key with `.`.
pub(crate) fn join(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}
