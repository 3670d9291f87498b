// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row representation of stored connections and column encoding.

use bgpvpn_core::{BgpvpnError, Connection, ConnectionPatch, ConnectionType, RouteTarget};
use rusqlite::types::Value as SqlValue;
use uuid::Uuid;

/// Column list shared by every SELECT, in [`ConnectionRow`] field order.
pub(crate) const COLUMNS: &str = "id, tenant_id, network_id, name, type, route_targets, \
                                   import_targets, export_targets, auto_aggregate";

/// A `bgpvpn_connections` row as read from SQLite, before decoding.
#[derive(Debug, Clone)]
pub struct ConnectionRow {
    pub id: String,
    pub tenant_id: String,
    pub network_id: Option<String>,
    pub name: String,
    pub connection_type: String,
    pub route_targets: String,
    pub import_targets: Option<String>,
    pub export_targets: Option<String>,
    pub auto_aggregate: bool,
}

impl ConnectionRow {
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get(0)?,
            tenant_id: row.get(1)?,
            network_id: row.get(2)?,
            name: row.get(3)?,
            connection_type: row.get(4)?,
            route_targets: row.get(5)?,
            import_targets: row.get(6)?,
            export_targets: row.get(7)?,
            auto_aggregate: row.get(8)?,
        })
    }
}

fn corrupt(column: &str, detail: impl std::fmt::Display) -> BgpvpnError {
    BgpvpnError::Persistence {
        source: format!("corrupt {column} column: {detail}").into(),
    }
}

fn decode_uuid(column: &str, text: &str) -> Result<Uuid, BgpvpnError> {
    Uuid::parse_str(text).map_err(|e| corrupt(column, e))
}

fn decode_targets(column: &str, text: &str) -> Result<Vec<RouteTarget>, BgpvpnError> {
    serde_json::from_str(text).map_err(|e| corrupt(column, e))
}

impl TryFrom<ConnectionRow> for Connection {
    type Error = BgpvpnError;

    fn try_from(row: ConnectionRow) -> Result<Self, Self::Error> {
        Ok(Connection {
            id: decode_uuid("id", &row.id)?,
            tenant_id: row.tenant_id,
            network_id: row
                .network_id
                .as_deref()
                .map(|text| decode_uuid("network_id", text))
                .transpose()?,
            name: row.name,
            connection_type: row
                .connection_type
                .parse::<ConnectionType>()
                .map_err(|e| corrupt("type", e))?,
            route_targets: decode_targets("route_targets", &row.route_targets)?,
            import_targets: row
                .import_targets
                .as_deref()
                .map(|text| decode_targets("import_targets", text))
                .transpose()?,
            export_targets: row
                .export_targets
                .as_deref()
                .map(|text| decode_targets("export_targets", text))
                .transpose()?,
            auto_aggregate: row.auto_aggregate,
        })
    }
}

/// JSON text for a route target list column.
pub(crate) fn encode_targets(targets: &[RouteTarget]) -> Result<String, BgpvpnError> {
    serde_json::to_string(targets).map_err(|e| BgpvpnError::Persistence {
        source: Box::new(e),
    })
}

fn encode_optional_targets(targets: Option<&[RouteTarget]>) -> Result<SqlValue, BgpvpnError> {
    Ok(match targets {
        Some(targets) => SqlValue::Text(encode_targets(targets)?),
        None => SqlValue::Null,
    })
}

/// Column values of a new row, in [`COLUMNS`] order.
pub(crate) fn encode_connection(connection: &Connection) -> Result<Vec<SqlValue>, BgpvpnError> {
    Ok(vec![
        SqlValue::Text(connection.id.to_string()),
        SqlValue::Text(connection.tenant_id.clone()),
        connection
            .network_id
            .map_or(SqlValue::Null, |id| SqlValue::Text(id.to_string())),
        SqlValue::Text(connection.name.clone()),
        SqlValue::Text(connection.connection_type.to_string()),
        SqlValue::Text(encode_targets(&connection.route_targets)?),
        encode_optional_targets(connection.import_targets.as_deref())?,
        encode_optional_targets(connection.export_targets.as_deref())?,
        SqlValue::Integer(i64::from(connection.auto_aggregate)),
    ])
}

/// `(column, value)` assignments for the attributes a patch touches.
pub(crate) fn encode_patch(
    patch: &ConnectionPatch,
) -> Result<Vec<(&'static str, SqlValue)>, BgpvpnError> {
    let mut sets = Vec::new();
    if let Some(network_id) = patch.network_id {
        sets.push((
            "network_id",
            network_id.map_or(SqlValue::Null, |id| SqlValue::Text(id.to_string())),
        ));
    }
    if let Some(name) = &patch.name {
        sets.push(("name", SqlValue::Text(name.clone())));
    }
    if let Some(route_targets) = &patch.route_targets {
        sets.push(("route_targets", SqlValue::Text(encode_targets(route_targets)?)));
    }
    if let Some(import_targets) = &patch.import_targets {
        sets.push(("import_targets", encode_optional_targets(import_targets.as_deref())?));
    }
    if let Some(export_targets) = &patch.export_targets {
        sets.push(("export_targets", encode_optional_targets(export_targets.as_deref())?));
    }
    if let Some(auto_aggregate) = patch.auto_aggregate {
        sets.push(("auto_aggregate", SqlValue::Integer(i64::from(auto_aggregate))));
    }
    Ok(sets)
}
