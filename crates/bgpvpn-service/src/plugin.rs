// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The BGP VPN service plugin.
//!
//! Every mutating operation follows the same sequence: validate, commit to
//! the store, then call the driver. A driver failure is returned to the
//! caller but the committed store change is kept; the failure is logged at
//! error level with the connection snapshot so operators can reconcile.

use std::sync::Arc;

use bgpvpn_core::{
    BgpvpnDriver, BgpvpnError, Connection, ConnectionFilter, ConnectionPatch, ConnectionStore,
    DriverOperation, LifecycleState, NewConnection, Port, RequestContext,
};
use bgpvpn_extension::{AttributeSchema, BgpvpnExtension, ValidatorRegistry, ALIAS, CONNECTION};
use serde_json::{Map, Value};
use tracing::{debug, error, info};
use uuid::Uuid;

pub const PLUGIN_NAME: &str = "BGPVPN";
pub const PLUGIN_TYPE: &str = "BGPVPN";
pub const PLUGIN_DESCRIPTION: &str = "Neutron BGP VPN connection Service Plugin";
pub const SUPPORTED_EXTENSION_ALIASES: [&str; 1] = [ALIAS];

/// Orchestrates the connection lifecycle between the store and one driver.
pub struct BgpvpnPlugin {
    store: Arc<dyn ConnectionStore>,
    driver: Arc<dyn BgpvpnDriver>,
    validators: Arc<ValidatorRegistry>,
    extension: BgpvpnExtension,
}

impl std::fmt::Debug for BgpvpnPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BgpvpnPlugin")
            .field("store", &self.store.name())
            .field("driver", &self.driver.name())
            .field("validators", &self.validators)
            .finish()
    }
}

impl BgpvpnPlugin {
    /// Wire the plugin. Loads the extension schema against `validators`,
    /// so schema errors surface here at startup.
    pub fn new(
        store: Arc<dyn ConnectionStore>,
        driver: Arc<dyn BgpvpnDriver>,
        validators: Arc<ValidatorRegistry>,
    ) -> Result<Self, BgpvpnError> {
        let extension = BgpvpnExtension::load(&validators)?;
        info!(
            driver = driver.name(),
            store = store.name(),
            "BGP VPN service plugin initialized"
        );
        Ok(Self {
            store,
            driver,
            validators,
            extension,
        })
    }

    pub fn plugin_name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn plugin_type(&self) -> &'static str {
        PLUGIN_TYPE
    }

    pub fn plugin_description(&self) -> &'static str {
        PLUGIN_DESCRIPTION
    }

    pub fn supported_extension_aliases(&self) -> &'static [&'static str] {
        &SUPPORTED_EXTENSION_ALIASES
    }

    pub fn extension(&self) -> &BgpvpnExtension {
        &self.extension
    }

    pub fn driver(&self) -> &Arc<dyn BgpvpnDriver> {
        &self.driver
    }

    pub fn store(&self) -> &Arc<dyn ConnectionStore> {
        &self.store
    }

    fn schema(&self) -> Result<&AttributeSchema, BgpvpnError> {
        self.extension.connection().map(|r| r.schema())
    }

    /// Validate `payload`, persist a new connection, and notify the driver.
    pub async fn create_connection(
        &self,
        ctx: &RequestContext,
        payload: &Map<String, Value>,
    ) -> Result<Connection, BgpvpnError> {
        let body = self
            .schema()?
            .prepare_create(&self.validators, ctx, payload)?;
        let new: NewConnection = decode(body)?;
        let connection = new.with_id(Uuid::new_v4());
        trace_state(&connection.id, LifecycleState::Validated);

        let stored = self.store.create(&connection).await?;
        trace_state(&stored.id, LifecycleState::Persisted);

        self.driver
            .create_connection(ctx, &stored)
            .await
            .map_err(|e| driver_failure(DriverOperation::CreateConnection, &stored, e))?;
        trace_state(&stored.id, LifecycleState::DriverAcknowledged);

        info!(connection_id = %stored.id, tenant = %stored.tenant_id, "connection created");
        Ok(stored)
    }

    /// Fetch one connection.
    pub async fn get_connection(
        &self,
        _ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Connection, BgpvpnError> {
        self.store.get(id).await?.ok_or_else(|| not_found(id))
    }

    /// List connections matching `filter`, in creation order.
    pub async fn list_connections(
        &self,
        _ctx: &RequestContext,
        filter: &ConnectionFilter,
    ) -> Result<Vec<Connection>, BgpvpnError> {
        self.store.list(filter).await
    }

    /// Apply an update to the mutable attributes of a connection.
    ///
    /// The driver receives both the previous and the new state.
    pub async fn update_connection(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        payload: &Map<String, Value>,
    ) -> Result<Connection, BgpvpnError> {
        let old = self.get_connection(ctx, id).await?;
        let body = self.schema()?.prepare_update(&self.validators, payload)?;
        let patch: ConnectionPatch = decode(body)?;
        trace_state(&id, LifecycleState::Validated);

        let new = self.store.update(id, &patch).await?;
        trace_state(&id, LifecycleState::Persisted);

        self.driver
            .update_connection(ctx, &old, &new)
            .await
            .map_err(|e| driver_failure(DriverOperation::UpdateConnection, &new, e))?;
        trace_state(&id, LifecycleState::DriverAcknowledged);

        info!(connection_id = %id, "connection updated");
        Ok(new)
    }

    /// Remove a connection and notify the driver with the removed snapshot.
    pub async fn delete_connection(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<(), BgpvpnError> {
        let snapshot = self.get_connection(ctx, id).await?;
        self.store.delete(id).await?;
        trace_state(&id, LifecycleState::Deleted);

        self.driver
            .delete_connection(ctx, &snapshot)
            .await
            .map_err(|e| driver_failure(DriverOperation::DeleteConnection, &snapshot, e))?;

        info!(connection_id = %id, "connection deleted");
        Ok(())
    }

    /// Refuse the deletion of `network_id` while connections reference it.
    ///
    /// Called by the owner of the network before it commits a deletion.
    pub async fn prevent_dependent_deletion(
        &self,
        _ctx: &RequestContext,
        network_id: Uuid,
    ) -> Result<(), BgpvpnError> {
        let referencing = self
            .store
            .list(&ConnectionFilter::by_network(network_id))
            .await?;
        if referencing.is_empty() {
            debug!(%network_id, "network has no dependent connections");
            return Ok(());
        }

        let connections: Vec<Uuid> = referencing.iter().map(|c| c.id).collect();
        debug!(%network_id, count = connections.len(), "network deletion blocked");
        Err(BgpvpnError::ReferencedResource {
            network_id,
            connections,
        })
    }

    /// Forward a port update to the driver.
    pub async fn notify_port_updated(
        &self,
        ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        self.driver
            .notify_port_updated(ctx, port)
            .await
            .map_err(|e| port_failure(DriverOperation::NotifyPortUpdated, port, e))
    }

    /// Forward a port removal to the driver.
    pub async fn remove_port_from_bgpvpn_agent(
        &self,
        ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        self.driver
            .remove_port_from_bgpvpn_agent(ctx, port)
            .await
            .map_err(|e| port_failure(DriverOperation::RemovePortFromBgpvpnAgent, port, e))
    }

    /// Render a connection for callers: visible attributes only, restricted
    /// to `fields` when given.
    pub fn render(
        &self,
        connection: &Connection,
        fields: Option<&[String]>,
    ) -> Result<Map<String, Value>, BgpvpnError> {
        let value = serde_json::to_value(connection)
            .map_err(|e| BgpvpnError::Internal(format!("cannot render connection: {e}")))?;
        let Value::Object(record) = value else {
            return Err(BgpvpnError::Internal(
                "connection did not render as an object".to_string(),
            ));
        };
        Ok(self.schema()?.project(&record, fields))
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: Map<String, Value>) -> Result<T, BgpvpnError> {
    serde_json::from_value(Value::Object(body)).map_err(|e| {
        BgpvpnError::Internal(format!("validated {CONNECTION} body does not decode: {e}"))
    })
}

fn not_found(id: Uuid) -> BgpvpnError {
    BgpvpnError::NotFound {
        resource: CONNECTION.to_string(),
        id: id.to_string(),
    }
}

fn trace_state(id: &Uuid, state: LifecycleState) {
    debug!(connection_id = %id, %state, "connection state");
}

/// Wrap a driver error raised after the store committed.
fn driver_failure(
    operation: DriverOperation,
    snapshot: &Connection,
    err: BgpvpnError,
) -> BgpvpnError {
    error!(
        connection_id = %snapshot.id,
        %operation,
        snapshot = ?snapshot,
        error = %err,
        "driver call failed after the store committed; store and driver may disagree"
    );
    match err {
        BgpvpnError::Driver { .. } => err,
        other => BgpvpnError::Driver {
            operation,
            connection_id: Some(snapshot.id),
            source: Box::new(other),
        },
    }
}

fn port_failure(operation: DriverOperation, port: &Port, err: BgpvpnError) -> BgpvpnError {
    error!(port_id = %port.id, %operation, error = %err, "driver port notification failed");
    match err {
        BgpvpnError::Driver { .. } => err,
        other => BgpvpnError::Driver {
            operation,
            connection_id: None,
            source: Box::new(other),
        },
    }
}
