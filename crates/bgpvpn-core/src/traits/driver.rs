// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver trait: the contract every BGP VPN backend implements.

use async_trait::async_trait;

use crate::error::BgpvpnError;
use crate::traits::adapter::ServiceAdapter;
use crate::types::{Connection, Port, RequestContext};

/// Backend that turns connection lifecycle events into control-plane actions.
///
/// Exactly one driver is active per deployment. Drivers only ever see
/// read-only snapshots of persisted state. Any method may fail; the
/// orchestrator surfaces the failure but does not undo the store write
/// that preceded the call.
#[async_trait]
pub trait BgpvpnDriver: ServiceAdapter {
    /// A connection was persisted.
    async fn create_connection(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError>;

    /// A connection was updated. Both states are passed so the driver can
    /// diff them (for example added and removed route targets).
    async fn update_connection(
        &self,
        ctx: &RequestContext,
        old: &Connection,
        new: &Connection,
    ) -> Result<(), BgpvpnError>;

    /// A connection was removed from the store.
    async fn delete_connection(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError>;

    /// A port on some network changed.
    async fn notify_port_updated(&self, ctx: &RequestContext, port: &Port)
        -> Result<(), BgpvpnError>;

    /// A port is going away and must be withdrawn from the BGP VPN agent.
    async fn remove_port_from_bgpvpn_agent(
        &self,
        ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError>;
}
