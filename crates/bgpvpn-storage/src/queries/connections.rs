// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection CRUD operations.

use bgpvpn_core::{BgpvpnError, Connection, ConnectionFilter, ConnectionPatch};
use rusqlite::types::Value as SqlValue;
use rusqlite::{params, params_from_iter, OptionalExtension};
use uuid::Uuid;

use crate::database::{map_tr_err, Database};
use crate::models::{encode_connection, encode_patch, ConnectionRow, COLUMNS};

fn not_found(id: Uuid) -> BgpvpnError {
    BgpvpnError::NotFound {
        resource: "bgpvpn_connection".to_string(),
        id: id.to_string(),
    }
}

/// Insert a new connection.
pub async fn insert_connection(db: &Database, connection: &Connection) -> Result<(), BgpvpnError> {
    let values = encode_connection(connection)?;
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &format!(
                    "INSERT INTO bgpvpn_connections ({COLUMNS}) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ),
                params_from_iter(values),
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a connection by id.
pub async fn get_connection(db: &Database, id: Uuid) -> Result<Option<Connection>, BgpvpnError> {
    let key = id.to_string();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<ConnectionRow>, rusqlite::Error> {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM bgpvpn_connections WHERE id = ?1"),
                params![key],
                ConnectionRow::from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)?;
    row.map(Connection::try_from).transpose()
}

/// Build the WHERE clause and its parameters for `filter`.
fn filter_clause(filter: &ConnectionFilter) -> (String, Vec<SqlValue>) {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    if let Some(tenant_id) = &filter.tenant_id {
        values.push(SqlValue::Text(tenant_id.clone()));
        conditions.push(format!("tenant_id = ?{}", values.len()));
    }
    if !filter.network_ids.is_empty() {
        let mut placeholders = Vec::new();
        for id in &filter.network_ids {
            values.push(SqlValue::Text(id.to_string()));
            placeholders.push(format!("?{}", values.len()));
        }
        conditions.push(format!("network_id IN ({})", placeholders.join(", ")));
    }
    if let Some(name) = &filter.name {
        values.push(SqlValue::Text(name.clone()));
        conditions.push(format!("name = ?{}", values.len()));
    }
    if let Some(connection_type) = filter.connection_type {
        values.push(SqlValue::Text(connection_type.to_string()));
        conditions.push(format!("type = ?{}", values.len()));
    }

    if conditions.is_empty() {
        (String::new(), values)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), values)
    }
}

/// List connections matching `filter`, oldest first.
pub async fn list_connections(
    db: &Database,
    filter: &ConnectionFilter,
) -> Result<Vec<Connection>, BgpvpnError> {
    let (clause, values) = filter_clause(filter);
    let rows = db
        .connection()
        .call(move |conn| -> Result<Vec<ConnectionRow>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM bgpvpn_connections{clause} ORDER BY seq"
            ))?;
            let rows = stmt
                .query_map(params_from_iter(values), ConnectionRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;
    rows.into_iter().map(Connection::try_from).collect()
}

/// Apply `patch` and return the updated connection.
///
/// The update and the read-back run in one transaction.
pub async fn update_connection(
    db: &Database,
    id: Uuid,
    patch: &ConnectionPatch,
) -> Result<Connection, BgpvpnError> {
    let sets = encode_patch(patch)?;
    let key = id.to_string();
    let row = db
        .connection()
        .call(move |conn| -> Result<Option<ConnectionRow>, rusqlite::Error> {
            let tx = conn.transaction()?;
            if !sets.is_empty() {
                let assignments = sets
                    .iter()
                    .enumerate()
                    .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let mut values: Vec<SqlValue> = sets.into_iter().map(|(_, v)| v).collect();
                values.push(SqlValue::Text(key.clone()));
                tx.execute(
                    &format!(
                        "UPDATE bgpvpn_connections SET {assignments} WHERE id = ?{}",
                        values.len()
                    ),
                    params_from_iter(values),
                )?;
            }
            let row = tx
                .query_row(
                    &format!("SELECT {COLUMNS} FROM bgpvpn_connections WHERE id = ?1"),
                    params![key],
                    ConnectionRow::from_row,
                )
                .optional()?;
            tx.commit()?;
            Ok(row)
        })
        .await
        .map_err(map_tr_err)?;
    row.ok_or_else(|| not_found(id)).and_then(Connection::try_from)
}

/// Delete a connection.
pub async fn delete_connection(db: &Database, id: Uuid) -> Result<(), BgpvpnError> {
    let key = id.to_string();
    let deleted = db
        .connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            conn.execute("DELETE FROM bgpvpn_connections WHERE id = ?1", params![key])
        })
        .await
        .map_err(map_tr_err)?;
    if deleted == 0 {
        return Err(not_found(id));
    }
    Ok(())
}
