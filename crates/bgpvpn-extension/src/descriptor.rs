// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The BGP VPN API extension: descriptor, connection attribute map, and the
//! resource information handed to the boundary layer.

use std::collections::BTreeMap;

use bgpvpn_core::{BgpvpnError, ConnectionType};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::attribute::{AttributeDescriptor, AttributeSchema, Converter, TENANT_ID};
use crate::resource::{Resource, ResourceRegistry};
use crate::validators::{
    ValidatorRegistry, BOOLEAN, ROUTE_TARGET_LIST, ROUTE_TARGET_LIST_OR_NONE, STRING, UUID,
    UUID_OR_NONE, VALUES,
};

pub const CONNECTION: &str = "bgpvpn_connection";
pub const CONNECTIONS: &str = "bgpvpn_connections";
pub const ALIAS: &str = "bgpvpn";
pub const PATH_PREFIX: &str = "/bgpvpn";
/// Service type under which drivers are registered.
pub const SERVICE_TYPE: &str = "BGPVPN";

const NAME_MAX_LEN: u64 = 255;

/// Static metadata describing the API extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionDescriptor {
    pub name: &'static str,
    pub alias: &'static str,
    pub description: &'static str,
    pub namespace: &'static str,
    pub updated: &'static str,
    pub path_prefix: &'static str,
}

impl Default for ExtensionDescriptor {
    fn default() -> Self {
        Self {
            name: "BGPVPN Connection extension",
            alias: ALIAS,
            description: "Extension for BGPVPN Connection service",
            namespace: "http://wiki.openstack.org/Neutron/bgpvpn/API_1.0",
            updated: "2014-06-10T17:00:00-00:00",
            path_prefix: PATH_PREFIX,
        }
    }
}

/// Attribute map of the `bgpvpn_connections` collection.
pub fn connection_schema(validators: &ValidatorRegistry) -> Result<AttributeSchema, BgpvpnError> {
    AttributeSchema::builder(CONNECTION)
        .field(
            AttributeDescriptor::new("id")
                .read_only()
                .primary_key()
                .validate(UUID, None),
        )
        .field(
            AttributeDescriptor::new(TENANT_ID)
                .required_by_policy()
                .validate(STRING, Some(json!(NAME_MAX_LEN))),
        )
        .field(
            AttributeDescriptor::new("network_id")
                .mutable()
                .default_value(Value::Null)
                .validate(UUID_OR_NONE, None),
        )
        .field(
            AttributeDescriptor::new("name")
                .mutable()
                .default_value(json!(""))
                .validate(STRING, Some(json!(NAME_MAX_LEN))),
        )
        .field(
            AttributeDescriptor::new("type")
                .default_value(json!(ConnectionType::default().to_string()))
                .validate(VALUES, Some(json!(ConnectionType::VALUES))),
        )
        .field(
            AttributeDescriptor::new("route_targets")
                .mutable()
                .default_value(json!([]))
                .convert(Converter::List)
                .validate(ROUTE_TARGET_LIST, None),
        )
        .field(
            AttributeDescriptor::new("import_targets")
                .mutable()
                .default_value(Value::Null)
                .convert(Converter::List)
                .validate(ROUTE_TARGET_LIST_OR_NONE, None),
        )
        .field(
            AttributeDescriptor::new("export_targets")
                .mutable()
                .default_value(Value::Null)
                .convert(Converter::List)
                .validate(ROUTE_TARGET_LIST_OR_NONE, None),
        )
        .field(
            AttributeDescriptor::new("auto_aggregate")
                .mutable()
                .default_value(json!(true))
                .convert(Converter::Boolean)
                .validate(BOOLEAN, None),
        )
        .build(validators)
}

/// Plural overrides for list attributes: each is exposed under its
/// singular-rooted element name.
pub const PLURAL_OVERRIDES: [(&str, &str); 3] = [
    ("route_targets", "route_target"),
    ("import_targets", "import_target"),
    ("export_targets", "export_target"),
];

/// The loaded extension: descriptor plus its resource registry.
#[derive(Debug, Clone)]
pub struct BgpvpnExtension {
    descriptor: ExtensionDescriptor,
    registry: ResourceRegistry,
}

impl BgpvpnExtension {
    /// Build the connection schema and register it.
    pub fn load(validators: &ValidatorRegistry) -> Result<Self, BgpvpnError> {
        let mut registry = ResourceRegistry::new();
        registry.register_resource(CONNECTION, connection_schema(validators)?, &PLURAL_OVERRIDES)?;
        debug!(resources = registry.len(), alias = ALIAS, "extension loaded");
        Ok(Self {
            descriptor: ExtensionDescriptor::default(),
            registry,
        })
    }

    pub fn descriptor(&self) -> &ExtensionDescriptor {
        &self.descriptor
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// The connection resource.
    pub fn connection(&self) -> Result<&Resource, BgpvpnError> {
        self.registry.get(CONNECTION).ok_or_else(|| BgpvpnError::NotFound {
            resource: "resource".to_string(),
            id: CONNECTION.to_string(),
        })
    }

    /// Route-building information for every registered resource.
    pub fn resource_info(&self) -> Vec<ResourceInfo> {
        self.registry
            .resources()
            .iter()
            .map(|r| ResourceInfo::new(&self.descriptor, r))
            .collect()
    }
}

/// Per-attribute flags the boundary layer uses to shape requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeInfo {
    pub name: String,
    pub allow_post: bool,
    pub allow_put: bool,
    pub is_visible: bool,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Serializable view of a resource for route and controller construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceInfo {
    pub collection: String,
    pub member: String,
    pub path_prefix: String,
    pub register_quota: bool,
    pub primary_key: String,
    pub attributes: Vec<AttributeInfo>,
    pub plural_mappings: BTreeMap<String, String>,
}

impl ResourceInfo {
    pub fn new(descriptor: &ExtensionDescriptor, resource: &Resource) -> Self {
        let schema = resource.schema();
        Self {
            collection: resource.collection().to_string(),
            member: resource.member().to_string(),
            path_prefix: descriptor.path_prefix.to_string(),
            register_quota: true,
            primary_key: schema.primary_key().name.clone(),
            attributes: schema
                .fields()
                .iter()
                .map(|f| AttributeInfo {
                    name: f.name.clone(),
                    allow_post: f.allow_post,
                    allow_put: f.allow_put,
                    is_visible: f.is_visible,
                    required: f.is_required() && f.name != TENANT_ID,
                    default: f.default.clone(),
                })
                .collect(),
            plural_mappings: resource.plural_mappings().clone(),
        }
    }
}
