// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resource registry: canonical naming and schema lookup for the boundary layer.

use std::collections::BTreeMap;

use bgpvpn_core::BgpvpnError;
use serde::Serialize;

use crate::attribute::AttributeSchema;

/// English plural of a resource member name.
pub fn pluralize(name: &str) -> String {
    if let Some(stem) = name.strip_suffix('y')
        && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
    {
        return format!("{stem}ies");
    }
    if name.ends_with(['s', 'x']) || name.ends_with("ch") || name.ends_with("sh") {
        return format!("{name}es");
    }
    format!("{name}s")
}

/// A registered resource type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    member: String,
    collection: String,
    schema: AttributeSchema,
    /// Plural name -> singular name, used to name list elements.
    plurals: BTreeMap<String, String>,
}

impl Resource {
    /// Singular name, e.g. `bgpvpn_connection`.
    pub fn member(&self) -> &str {
        &self.member
    }

    /// Collection name, e.g. `bgpvpn_connections`.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn schema(&self) -> &AttributeSchema {
        &self.schema
    }

    pub fn plural_mappings(&self) -> &BTreeMap<String, String> {
        &self.plurals
    }

    /// Singular form for a plural collection or list attribute name.
    pub fn singular_of(&self, plural: &str) -> Option<&str> {
        self.plurals.get(plural).map(String::as_str)
    }
}

/// Ordered set of resources exposed by an extension.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: Vec<Resource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name` with its schema.
    ///
    /// The collection name is derived with [`pluralize`]. Each
    /// `(plural, singular)` override is added to the plural mappings and
    /// replaces a derived entry with the same plural.
    ///
    /// Member and collection names share one namespace: registration fails
    /// when either new name matches an existing member or collection name,
    /// e.g. `bus` after `bu` (whose collection is `bus`).
    pub fn register_resource(
        &mut self,
        name: &str,
        schema: AttributeSchema,
        plural_overrides: &[(&str, &str)],
    ) -> Result<&Resource, BgpvpnError> {
        let collection = pluralize(name);
        if self.get(name).is_some() || self.get(&collection).is_some() {
            return Err(BgpvpnError::ResourceConflict {
                name: name.to_string(),
            });
        }

        let mut plurals = BTreeMap::new();
        plurals.insert(collection.clone(), name.to_string());
        for (plural, singular) in plural_overrides {
            plurals.insert((*plural).to_string(), (*singular).to_string());
        }

        self.resources.push(Resource {
            member: name.to_string(),
            collection,
            schema,
            plurals,
        });
        let index = self.resources.len() - 1;
        Ok(&self.resources[index])
    }

    /// Resources in registration order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    /// Look up a resource by member or collection name.
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.member == name || r.collection == name)
    }

    /// The attribute schema of a registered resource.
    pub fn describe(&self, name: &str) -> Result<&AttributeSchema, BgpvpnError> {
        self.get(name)
            .map(Resource::schema)
            .ok_or_else(|| BgpvpnError::NotFound {
                resource: "resource".to_string(),
                id: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeDescriptor;
    use crate::validators::ValidatorRegistry;

    fn schema(resource: &str) -> AttributeSchema {
        AttributeSchema::builder(resource)
            .field(AttributeDescriptor::new("id").read_only().primary_key())
            .build(&ValidatorRegistry::new())
            .unwrap()
    }

    #[test]
    fn pluralize_handles_common_suffixes() {
        assert_eq!(pluralize("bgpvpn_connection"), "bgpvpn_connections");
        assert_eq!(pluralize("policy"), "policies");
        assert_eq!(pluralize("gateway"), "gateways");
        assert_eq!(pluralize("address"), "addresses");
        assert_eq!(pluralize("switch"), "switches");
    }

    #[test]
    fn register_derives_collection_and_overrides() {
        let mut registry = ResourceRegistry::new();
        let resource = registry
            .register_resource(
                "bgpvpn_connection",
                schema("bgpvpn_connection"),
                &[("route_targets", "route_target")],
            )
            .unwrap();
        assert_eq!(resource.collection(), "bgpvpn_connections");
        assert_eq!(resource.singular_of("bgpvpn_connections"), Some("bgpvpn_connection"));
        assert_eq!(resource.singular_of("route_targets"), Some("route_target"));
        assert_eq!(resource.singular_of("networks"), None);
    }

    #[test]
    fn overrides_replace_derived_mapping() {
        let mut registry = ResourceRegistry::new();
        let resource = registry
            .register_resource("policy", schema("policy"), &[("policies", "rule_set")])
            .unwrap();
        assert_eq!(resource.singular_of("policies"), Some("rule_set"));
    }

    #[test]
    fn duplicate_resource_is_a_conflict() {
        let mut registry = ResourceRegistry::new();
        registry.register_resource("widget", schema("widget"), &[]).unwrap();
        let err = registry
            .register_resource("widget", schema("widget"), &[])
            .unwrap_err();
        assert!(matches!(err, BgpvpnError::ResourceConflict { name } if name == "widget"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn member_and_collection_names_share_a_namespace() {
        let mut registry = ResourceRegistry::new();
        registry.register_resource("bu", schema("bu"), &[]).unwrap();
        let err = registry.register_resource("bus", schema("bus"), &[]).unwrap_err();
        assert!(matches!(err, BgpvpnError::ResourceConflict { name } if name == "bus"));

        let mut registry = ResourceRegistry::new();
        registry.register_resource("bus", schema("bus"), &[]).unwrap();
        assert!(registry.register_resource("bu", schema("bu"), &[]).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn resources_keep_registration_order() {
        let mut registry = ResourceRegistry::new();
        registry.register_resource("zeta", schema("zeta"), &[]).unwrap();
        registry.register_resource("alpha", schema("alpha"), &[]).unwrap();
        let names: Vec<&str> = registry.resources().iter().map(Resource::member).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn describe_resolves_either_name() {
        let mut registry = ResourceRegistry::new();
        registry.register_resource("widget", schema("widget"), &[]).unwrap();
        assert!(registry.describe("widget").is_ok());
        assert!(registry.describe("widgets").is_ok());
        assert!(matches!(
            registry.describe("gadget"),
            Err(BgpvpnError::NotFound { .. })
        ));
    }
}
