//! # Construction Inputs and Outputs
//!
//! [`Scope`] and [`ResourceProps`] go into a construction;
//! [`ResourceHandle`] comes back to the caller and [`ResolvedBinding`] goes
//! to the emission layer through a [`BindingSink`].

use serde::Serialize;
use serde_json::{Map, Value};

use apiver_core::{
    sha256_digest, ApiVersion, CanonicalBytes, CanonicalizationError, ContentDigest, ResourceTypeId,
    SupportLevel,
};
use apiver_registry::{Advisory, MigrationAnalysis};
use apiver_schema::ValidationWarning;

// ─── Inputs ──────────────────────────────────────────────────────────

/// Where in the construct tree an instance is created, and the id of the
/// deployment scope it lands in by default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    path: String,
    id: String,
}

impl Scope {
    /// A root scope: `path` names the construct tree root, `id` is the
    /// deployment scope (`/subscriptions/<sub>/resourceGroups/<rg>`).
    pub fn new(path: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            id: id.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// A nested scope sharing this scope's deployment id.
    pub fn child(&self, segment: &str) -> Scope {
        Scope {
            path: self.construct_path(segment),
            id: self.id.clone(),
        }
    }

    /// Path of a construct named `id` directly under this scope.
    pub fn construct_path(&self, id: &str) -> String {
        if self.path.is_empty() {
            id.to_string()
        } else {
            format!("{}/{id}", self.path)
        }
    }
}

/// Caller-supplied properties of one resource instance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceProps {
    /// Resource name; defaults to the construct id.
    pub name: Option<String>,
    /// Pinned API version; defaults to the resource type's default.
    pub api_version: Option<ApiVersion>,
    /// Version-agnostic properties, a JSON object.
    pub properties: Value,
}

impl ResourceProps {
    pub fn new(properties: Value) -> Self {
        Self {
            name: None,
            api_version: None,
            properties,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn pinned(mut self, version: ApiVersion) -> Self {
        self.api_version = Some(version);
        self
    }
}

// ─── Outputs ─────────────────────────────────────────────────────────

/// What the caller gets back from a successful construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceHandle {
    pub construct_path: String,
    pub name: String,
    /// Opaque token other resources can use as this resource's id:
    /// `${<type_slug>.<construct_path>.id}`.
    pub reference: String,
    pub resolved_api_version: ApiVersion,
    pub support_level: SupportLevel,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<Advisory>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationWarning>,
    /// Cost of moving off a deprecated version, when analysis is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationAnalysis>,
}

/// Build the reference token for a construct.
pub fn reference_token(resource_type: &ResourceTypeId, construct_path: &str) -> String {
    format!("${{{}.{construct_path}.id}}", resource_type.slug())
}

/// The terminal artifact of one construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedBinding {
    pub resource_type: ResourceTypeId,
    pub api_version: ApiVersion,
    pub parent_id: String,
    pub name: String,
    pub wire_body: Value,
}

impl ResolvedBinding {
    /// `<parent_id>/<last type segment>/<name>`.
    pub fn qualified_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.parent_id.trim_end_matches('/'),
            self.resource_type.last_segment(),
            self.name
        )
    }

    /// RFC 8785 bytes of the wire body.
    pub fn canonical_body(&self) -> Result<CanonicalBytes, CanonicalizationError> {
        CanonicalBytes::new(&self.wire_body)
    }

    pub fn body_digest(&self) -> Result<ContentDigest, CanonicalizationError> {
        Ok(sha256_digest(&self.canonical_body()?))
    }

    /// The body wrapped in the resource envelope most providers expect:
    /// `{"type", "apiVersion", "name", "properties"}`.
    pub fn envelope(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert("type".into(), Value::from(self.resource_type.as_str()));
        envelope.insert("apiVersion".into(), Value::from(self.api_version.as_str()));
        envelope.insert("name".into(), Value::from(self.name.as_str()));
        envelope.insert("properties".into(), self.wire_body.clone());
        Value::Object(envelope)
    }
}

/// Successful construction: the handle plus the binding to emit.
#[derive(Debug, Clone, PartialEq)]
pub struct Constructed {
    pub handle: ResourceHandle,
    pub binding: ResolvedBinding,
}

/// The emission boundary. Receives each binding exactly once, and only
/// from constructions that succeeded.
pub trait BindingSink {
    fn emit(&mut self, binding: ResolvedBinding);
}

impl BindingSink for Vec<ResolvedBinding> {
    fn emit(&mut self, binding: ResolvedBinding) {
        self.push(binding);
    }
}
