// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver that accepts every notification and only logs it.
//!
//! Used as the default so the API can run without a BGP control plane.

use std::sync::Arc;

use async_trait::async_trait;
use bgpvpn_core::types::{AdapterType, HealthStatus};
use bgpvpn_core::{BgpvpnDriver, BgpvpnError, Connection, Port, RequestContext, ServiceAdapter};
use tracing::{info, warn};

use crate::registry::DriverFactory;

pub const DUMMY_DRIVER: &str = "dummy";

#[derive(Debug, Default)]
pub struct DummyDriver;

impl DummyDriver {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ServiceAdapter for DummyDriver {
    fn name(&self) -> &str {
        DUMMY_DRIVER
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Driver
    }

    async fn health_check(&self) -> Result<HealthStatus, BgpvpnError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl BgpvpnDriver for DummyDriver {
    async fn create_connection(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError> {
        info!(
            tenant = %ctx.tenant_id,
            connection_id = %connection.id,
            route_targets = connection.route_targets.len(),
            "dummy driver: create connection"
        );
        Ok(())
    }

    async fn update_connection(
        &self,
        ctx: &RequestContext,
        old: &Connection,
        new: &Connection,
    ) -> Result<(), BgpvpnError> {
        info!(
            tenant = %ctx.tenant_id,
            connection_id = %new.id,
            network_changed = old.network_id != new.network_id,
            "dummy driver: update connection"
        );
        Ok(())
    }

    async fn delete_connection(
        &self,
        ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError> {
        info!(
            tenant = %ctx.tenant_id,
            connection_id = %connection.id,
            "dummy driver: delete connection"
        );
        Ok(())
    }

    async fn notify_port_updated(
        &self,
        ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        info!(tenant = %ctx.tenant_id, port_id = %port.id, "dummy driver: port updated");
        Ok(())
    }

    async fn remove_port_from_bgpvpn_agent(
        &self,
        ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        info!(tenant = %ctx.tenant_id, port_id = %port.id, "dummy driver: port removed");
        Ok(())
    }
}

/// Factory registered under [`DUMMY_DRIVER`]. The driver takes no settings.
#[derive(Debug, Default)]
pub struct DummyDriverFactory;

impl DriverFactory for DummyDriverFactory {
    fn create(&self, settings: &toml::Table) -> Result<Arc<dyn BgpvpnDriver>, BgpvpnError> {
        for key in settings.keys() {
            warn!(driver = DUMMY_DRIVER, key = %key, "ignoring driver setting");
        }
        Ok(Arc::new(DummyDriver::new()))
    }
}
