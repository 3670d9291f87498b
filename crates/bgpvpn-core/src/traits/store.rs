// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Store trait for connection persistence backends.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::BgpvpnError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{Connection, ConnectionFilter, ConnectionPatch};

/// Durable owner of connection records.
///
/// Every method is atomic. Failures are reported as
/// [`BgpvpnError::Persistence`], except `update` and `delete` on an unknown
/// id which report [`BgpvpnError::NotFound`].
#[async_trait]
pub trait ConnectionStore: ServiceAdapter {
    /// Prepares the backend (migrations, connection pool, etc.).
    async fn initialize(&self) -> Result<(), BgpvpnError>;

    /// Flushes pending writes and releases connections.
    async fn close(&self) -> Result<(), BgpvpnError>;

    /// Inserts a new record and returns it as stored.
    async fn create(&self, connection: &Connection) -> Result<Connection, BgpvpnError>;

    /// Fetches a record by id.
    async fn get(&self, id: Uuid) -> Result<Option<Connection>, BgpvpnError>;

    /// Lists records matching `filter`, in creation order.
    async fn list(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, BgpvpnError>;

    /// Applies `patch` to the record and returns the new state.
    async fn update(&self, id: Uuid, patch: &ConnectionPatch) -> Result<Connection, BgpvpnError>;

    /// Removes the record.
    async fn delete(&self, id: Uuid) -> Result<(), BgpvpnError>;
}
