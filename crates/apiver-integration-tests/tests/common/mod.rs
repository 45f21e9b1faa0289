//! Fixture resource types shared by the integration tests.
//!
//! - `StorageAccount`: defined in code. Logical `accountType` is sent as
//!   `accountType` up to 2023-05-01 and as `sku.name` from 2024-01-01.
//! - Resource groups: loaded from a YAML catalog, parent falls back to the
//!   subscription scope.
//! - Subnets: loaded from a YAML catalog, parent virtual network required.

#![allow(dead_code)]

use apiver_core::{ApiVersion, ResourceTypeId, SupportLevel};
use apiver_resource::{CatalogResource, ParentResolver, ResourceDefinition, Scope};
use apiver_schema::{
    ApiSchema, BreakingChange, BreakingChangeType, PropertyDefinition, PropertyType, ValidationRule,
    VersionDescriptor,
};
use serde_json::{json, Value};

pub const SUBSCRIPTION: &str = "/subscriptions/00000000-0000-0000-0000-000000000001";
pub const RESOURCE_GROUP: &str =
    "/subscriptions/00000000-0000-0000-0000-000000000001/resourceGroups/rg-app";

/// Install a test-friendly subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn v(s: &str) -> ApiVersion {
    ApiVersion::new(s).unwrap()
}

pub fn app_scope() -> Scope {
    Scope::new("app", RESOURCE_GROUP)
}

// ---------------------------------------------------------------------------
// Storage account (code-defined)
// ---------------------------------------------------------------------------

pub struct StorageAccount {
    resource_type: ResourceTypeId,
    default_version: ApiVersion,
}

impl StorageAccount {
    pub fn new() -> Self {
        Self::with_default("2024-01-01")
    }

    pub fn with_default(version: &str) -> Self {
        Self {
            resource_type: ResourceTypeId::new("Microsoft.Storage/storageAccounts").unwrap(),
            default_version: v(version),
        }
    }
}

pub fn storage_schema() -> ApiSchema {
    let ip_rule = ApiSchema::new()
        .property(
            "value",
            PropertyDefinition::string()
                .required()
                .with_rule(ValidationRule::pattern(r"^\d{1,3}(\.\d{1,3}){3}(/\d{1,2})?$")),
        )
        .property(
            "action",
            PropertyDefinition::enumeration(["Allow"]).with_default(json!("Allow")),
        );
    let network_rules = ApiSchema::new()
        .property(
            "defaultAction",
            PropertyDefinition::enumeration(["Allow", "Deny"]).required(),
        )
        .property(
            "ipRules",
            PropertyDefinition::array(PropertyType::Object(ip_rule))
                .with_rule(ValidationRule::length(None, Some(200))),
        );

    ApiSchema::new()
        .property(
            "name",
            PropertyDefinition::string()
                .required()
                .with_rule(ValidationRule::length(Some(3), Some(24)))
                .with_rule(
                    ValidationRule::pattern("^[a-z0-9]+$")
                        .with_description("must be lowercase letters and digits"),
                ),
        )
        .property("location", PropertyDefinition::string().required())
        .property(
            "accountType",
            PropertyDefinition::enumeration(["Standard_LRS", "Standard_GRS", "Premium_LRS"])
                .with_default(json!("Standard_LRS"))
                .renamed_in(v("2024-01-01"), "sku.name"),
        )
        .property(
            "kind",
            PropertyDefinition::enumeration(["StorageV2", "BlobStorage"]).with_default(json!("StorageV2")),
        )
        .property(
            "httpsOnly",
            PropertyDefinition::boolean()
                .with_default(json!(true))
                .renamed_in(v("2024-01-01"), "properties.supportsHttpsTrafficOnly"),
        )
        .property("networkRules", PropertyDefinition::object(network_rules))
        .property("tags", PropertyDefinition::any())
}

pub fn storage_versions() -> Vec<VersionDescriptor> {
    vec![
        VersionDescriptor::new(v("2021-01-01"), SupportLevel::Deprecated, storage_schema()),
        VersionDescriptor::new(v("2023-05-01"), SupportLevel::Maintenance, storage_schema()),
        VersionDescriptor::new(v("2024-01-01"), SupportLevel::Active, storage_schema())
            .with_breaking_change(
                BreakingChange::new(
                    BreakingChangeType::PropertyRenamed,
                    "accountType",
                    "account type moved under sku",
                )
                .with_migration_path("no caller change; sent as sku.name"),
            ),
    ]
}

impl ResourceDefinition for StorageAccount {
    fn resource_type(&self) -> &ResourceTypeId {
        &self.resource_type
    }

    fn default_version(&self) -> &ApiVersion {
        &self.default_version
    }

    fn version_descriptors(&self) -> Vec<VersionDescriptor> {
        storage_versions()
    }

    fn create_resource_body(&self, name: &str, properties: &Value) -> Value {
        let mut body = properties.clone();
        if let Some(map) = body.as_object_mut() {
            map.insert("name".to_string(), Value::from(name));
        }
        body
    }

    fn parent_resolver(&self) -> ParentResolver {
        ParentResolver::optional("resourceGroupId")
    }
}

// ---------------------------------------------------------------------------
// Catalog-defined types
// ---------------------------------------------------------------------------

pub const RESOURCE_GROUP_CATALOG: &str = r#"
resource_type: Microsoft.Resources/resourceGroups
default_version: "2024-03-01"
versions:
  - version: "2021-04-01"
    support_level: deprecated
    schema:
      properties:
        location: { type: { scalar: string }, required: true }
        tags: { type: { scalar: any } }
  - version: "2024-03-01"
    support_level: active
    schema:
      properties:
        location: { type: { scalar: string }, required: true }
        tags: { type: { scalar: any }, default: {} }
        managedBy: { type: { scalar: string } }
"#;

pub const SUBNET_CATALOG: &str = r#"
resource_type: Microsoft.Network/virtualNetworks/subnets
versions:
  - version: "2023-09-01"
    support_level: maintenance
    schema:
      properties:
        addressPrefix:
          type: { scalar: string }
          required: true
          wire_name: properties.addressPrefix
  - version: "2024-05-01"
    support_level: active
    schema:
      properties:
        addressPrefix:
          type: { scalar: string }
          required: true
          wire_name: properties.addressPrefix
          rules:
            - rule: pattern
              pattern: "^[0-9./]+$"
              description: must be an IPv4 CIDR block
        networkSecurityGroup:
          type:
            object:
              properties:
                id: { type: { scalar: string }, required: true }
          wire_name: properties.networkSecurityGroup
        delegations:
          type:
            array:
              object:
                properties:
                  serviceName:
                    type: { scalar: string }
                    required: true
                    wire_name: properties.serviceName
          wire_name: properties.delegations
"#;

pub fn resource_group() -> CatalogResource {
    CatalogResource::from_yaml_str(
        RESOURCE_GROUP_CATALOG,
        ParentResolver::Optional {
            property: "subscriptionId".to_string(),
            fallback: Some(SUBSCRIPTION.to_string()),
        },
    )
    .unwrap()
}

pub fn subnet() -> CatalogResource {
    CatalogResource::from_yaml_str(SUBNET_CATALOG, ParentResolver::required("virtualNetworkId")).unwrap()
}
