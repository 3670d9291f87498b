// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the BGP VPN service.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
/// `ASN:NN` with both halves an ASCII decimal integer in 0-65535 and no leading zeros.
/// `ASN:NN` with both halves a decimal integer in 0-65535 and no leading zeros.
pub const ROUTE_TARGET_PATTERN: &str = "^(\
    (?:0|[1-9][0-9]{0,3}|[1-5][0-9]{4}|6[0-4][0-9]{3}|65[0-4][0-9]{2}|655[0-2][0-9]|6553[0-5])\
    :(?:0|[1-9][0-9]{0,3}|[1-5][0-9]{4}|6[0-4][0-9]{3}|65[0-4][0-9]{2}|655[0-2][0-9]|6553[0-5]))$";

static ROUTE_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ROUTE_TARGET_PATTERN).expect("route target pattern is valid"));

/// Returns true if `value` is a well-formed route target string.
pub fn is_route_target(value: &str) -> bool {
    ROUTE_TARGET_RE.is_match(value)
}

/// A BGP route target extended community in `ASN:NN` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteTarget {
    pub asn: u16,
    pub nn: u16,
}

impl RouteTarget {
    pub const fn new(asn: u16, nn: u16) -> Self {
        Self { asn, nn }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asn, self.nn)
    }
}

/// Returned when a string is not a valid route target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid route target (expected ASN:NN with ASN and NN in 0-65535)")]
pub struct InvalidRouteTarget(pub String);

impl FromStr for RouteTarget {
    type Err = InvalidRouteTarget;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_route_target(s) {
            return Err(InvalidRouteTarget(s.to_string()));
        }
        // The pattern guarantees exactly one ':' and in-range halves.
        let (asn, nn) = s
            .split_once(':')
            .ok_or_else(|| InvalidRouteTarget(s.to_string()))?;
        let asn = asn.parse().map_err(|_| InvalidRouteTarget(s.to_string()))?;
        let nn = nn.parse().map_err(|_| InvalidRouteTarget(s.to_string()))?;
        Ok(Self { asn, nn })
    }
}

impl TryFrom<String> for RouteTarget {
    type Error = InvalidRouteTarget;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RouteTarget> for String {
    fn from(rt: RouteTarget) -> Self {
        rt.to_string()
    }
}

/// BGP VPN flavour. Fixed at creation time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionType {
    #[default]
    L3,
    L2,
}

impl ConnectionType {
    /// Wire values accepted by the `type` attribute, default first.
    pub const VALUES: [&'static str; 2] = ["l3", "l2"];
}

/// A persisted BGP VPN connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub tenant_id: String,
    pub network_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub route_targets: Vec<RouteTarget>,
    pub import_targets: Option<Vec<RouteTarget>>,
    pub export_targets: Option<Vec<RouteTarget>>,
    pub auto_aggregate: bool,
}

/// A validated create request, before the store assigns it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewConnection {
    pub tenant_id: String,
    pub network_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub route_targets: Vec<RouteTarget>,
    pub import_targets: Option<Vec<RouteTarget>>,
    pub export_targets: Option<Vec<RouteTarget>>,
    pub auto_aggregate: bool,
}

impl NewConnection {
    /// Attach an identifier, producing the record handed to the store.
    pub fn with_id(self, id: Uuid) -> Connection {
        Connection {
            id,
            tenant_id: self.tenant_id,
            network_id: self.network_id,
            name: self.name,
            connection_type: self.connection_type,
            route_targets: self.route_targets,
            import_targets: self.import_targets,
            export_targets: self.export_targets,
            auto_aggregate: self.auto_aggregate,
        }
    }
}

/// Replacement values for the mutable attributes of a connection.
///
/// `None` leaves the attribute untouched. For nullable attributes
/// `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionPatch {
    #[serde(default, deserialize_with = "double_option")]
    pub network_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub route_targets: Option<Vec<RouteTarget>>,
    #[serde(default, deserialize_with = "double_option")]
    pub import_targets: Option<Option<Vec<RouteTarget>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub export_targets: Option<Option<Vec<RouteTarget>>>,
    #[serde(default)]
    pub auto_aggregate: Option<bool>,
}

impl ConnectionPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Produce the post-update state of `current`.
    pub fn apply(&self, current: &Connection) -> Connection {
        let mut next = current.clone();
        if let Some(network_id) = self.network_id {
            next.network_id = network_id;
        }
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(route_targets) = &self.route_targets {
            next.route_targets = route_targets.clone();
        }
        if let Some(import_targets) = &self.import_targets {
            next.import_targets = import_targets.clone();
        }
        if let Some(export_targets) = &self.export_targets {
            next.export_targets = export_targets.clone();
        }
        if let Some(auto_aggregate) = self.auto_aggregate {
            next.auto_aggregate = auto_aggregate;
        }
        next
    }
}

fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Selection criteria for listing connections. Empty criteria match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFilter {
    pub tenant_id: Option<String>,
    /// Matches connections bound to any of these networks.
    pub network_ids: Vec<Uuid>,
    pub name: Option<String>,
    pub connection_type: Option<ConnectionType>,
}

impl ConnectionFilter {
    /// Filter matching every connection attached to `network_id`.
    pub fn by_network(network_id: Uuid) -> Self {
        Self {
            network_ids: vec![network_id],
            ..Self::default()
        }
    }

    pub fn matches(&self, connection: &Connection) -> bool {
        if let Some(tenant_id) = &self.tenant_id
            && &connection.tenant_id != tenant_id
        {
            return false;
        }
        if !self.network_ids.is_empty()
            && !connection
                .network_id
                .is_some_and(|id| self.network_ids.contains(&id))
        {
            return false;
        }
        if let Some(name) = &self.name
            && &connection.name != name
        {
            return false;
        }
        if let Some(connection_type) = self.connection_type
            && connection.connection_type != connection_type
        {
            return false;
        }
        true
    }
}

/// Caller identity and correlation data for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub tenant_id: String,
    pub is_admin: bool,
    pub request_id: String,
}

impl RequestContext {
    /// Context for a tenant-scoped request with a fresh request id.
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            is_admin: false,
            request_id: format!("req-{}", Uuid::new_v4()),
        }
    }

    /// Context for internal or operator-initiated calls.
    pub fn admin() -> Self {
        Self {
            is_admin: true,
            ..Self::new("admin")
        }
    }
}

/// A port lifecycle event forwarded from the host to the active driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub id: Uuid,
    pub network_id: Uuid,
    pub device_id: String,
    pub device_owner: String,
    pub mac_address: String,
    #[serde(default)]
    pub fixed_ips: Vec<String>,
}

/// Progress of a connection through a single orchestrator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LifecycleState {
    Absent,
    Validated,
    Persisted,
    DriverAcknowledged,
    Deleted,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays in the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Driver,
    Storage,
}
