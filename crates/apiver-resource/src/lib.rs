//! # apiver-resource — The Resource Construction Protocol
//!
//! Every concrete resource type (storage account, subnet, alert rule)
//! implements [`ResourceDefinition`]. A [`Constructor`] borrows the
//! [`VersionRegistry`](apiver_registry::VersionRegistry) owned by the root
//! of the construction graph and turns `(scope, id, props)` into a
//! [`ResourceHandle`] for the caller and a [`ResolvedBinding`] for the
//! emission layer.
//!
//! ## Construction
//!
//! ```text
//! Registered → VersionResolving → VersionResolved → BodyBuilding
//!            → Validated → Transformed → Bound
//! ```
//!
//! Construction is all-or-nothing. A failed construction produces no
//! binding, and its [`ConstructionError`] records the phase it stopped in.
//!
//! ## Parents
//!
//! [`ParentResolver`] supplies the id of the enclosing resource. Child
//! resources require it; top-level resources fall back to their scope.
//!
//! ## Crate Policy
//!
//! - No I/O beyond loading config and catalog files.
//! - No `unwrap()` or `panic!()` outside tests.

pub mod binding;
pub mod config;
pub mod constructor;
pub mod definition;
pub mod error;
pub mod parent;

pub use binding::{
    reference_token, BindingSink, Constructed, ResolvedBinding, ResourceHandle, ResourceProps, Scope,
};
pub use config::{ConfigError, EngineConfig};
pub use constructor::Constructor;
pub use definition::{CatalogResource, DefinitionError, ResourceDefinition};
pub use error::ConstructionError;
pub use parent::{is_path_shaped, ParentError, ParentResolver};

#[cfg(test)]
mod proptests {
    use super::*;
    use apiver_core::{ApiVersion, ResourceTypeId, SupportLevel};
    use apiver_registry::VersionRegistry;
    use apiver_schema::{ApiSchema, PropertyDefinition, VersionDescriptor};
    use proptest::prelude::*;
    use serde_json::json;

    struct Tagged;

    impl ResourceDefinition for Tagged {
        fn resource_type(&self) -> &ResourceTypeId {
            static TYPE: std::sync::OnceLock<ResourceTypeId> = std::sync::OnceLock::new();
            TYPE.get_or_init(|| ResourceTypeId::new("Microsoft.Resources/tags").unwrap())
        }

        fn default_version(&self) -> &ApiVersion {
            static VERSION: std::sync::OnceLock<ApiVersion> = std::sync::OnceLock::new();
            VERSION.get_or_init(|| ApiVersion::new("2024-03-01").unwrap())
        }

        fn version_descriptors(&self) -> Vec<VersionDescriptor> {
            vec![VersionDescriptor::new(
                self.default_version().clone(),
                SupportLevel::Active,
                ApiSchema::new()
                    .property("label", PropertyDefinition::string().required().wire_name("properties.label"))
                    .property("weight", PropertyDefinition::integer().with_default(json!(1))),
            )]
        }

        fn parent_resolver(&self) -> ParentResolver {
            ParentResolver::fixed("/subscriptions/s1")
        }
    }

    proptest! {
        #[test]
        fn repeated_construction_yields_identical_bytes(label in "[a-z]{1,12}", weight in proptest::option::of(0i64..1000)) {
            let registry = VersionRegistry::default();
            let ctor = Constructor::new(&registry, EngineConfig::default());
            let mut props = json!({"label": label.clone()});
            if let Some(w) = weight {
                props["weight"] = json!(w);
            }
            let scope = Scope::new("app", "/subscriptions/s1");
            let a = ctor.construct(&Tagged, &scope, "t", ResourceProps::new(props.clone())).unwrap();
            let b = ctor.construct(&Tagged, &scope, "t", ResourceProps::new(props)).unwrap();
            prop_assert_eq!(a.binding.canonical_body().unwrap(), b.binding.canonical_body().unwrap());
            prop_assert_eq!(a.binding.body_digest().unwrap(), b.binding.body_digest().unwrap());
            prop_assert_eq!(&a.binding.wire_body["properties"]["label"], &json!(label));
        }
    }
}
