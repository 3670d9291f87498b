// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock driver for deterministic lifecycle tests.
//!
//! `MockDriver` records every call it receives, in order, and can be told
//! to fail specific operations.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use bgpvpn_core::types::{AdapterType, HealthStatus};
use bgpvpn_core::{
    BgpvpnDriver, BgpvpnError, Connection, DriverOperation, Port, RequestContext, ServiceAdapter,
};

/// A call received by [`MockDriver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCall {
    Create(Connection),
    Update { old: Connection, new: Connection },
    Delete(Connection),
    PortUpdated(Port),
    PortRemoved(Port),
}

impl DriverCall {
    pub fn operation(&self) -> DriverOperation {
        match self {
            DriverCall::Create(_) => DriverOperation::CreateConnection,
            DriverCall::Update { .. } => DriverOperation::UpdateConnection,
            DriverCall::Delete(_) => DriverOperation::DeleteConnection,
            DriverCall::PortUpdated(_) => DriverOperation::NotifyPortUpdated,
            DriverCall::PortRemoved(_) => DriverOperation::RemovePortFromBgpvpnAgent,
        }
    }
}

/// A driver that records calls and fails the operations it is told to.
///
/// Failing calls are still recorded.
pub struct MockDriver {
    calls: Arc<Mutex<Vec<DriverCall>>>,
    failing: Arc<Mutex<HashSet<DriverOperation>>>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Make every future call of `operation` fail.
    pub async fn fail_on(&self, operation: DriverOperation) {
        self.failing.lock().await.insert(operation);
    }

    /// Stop failing `operation`.
    pub async fn recover(&self, operation: DriverOperation) {
        self.failing.lock().await.remove(&operation);
    }

    /// Calls received so far.
    pub async fn calls(&self) -> Vec<DriverCall> {
        self.calls.lock().await.clone()
    }

    /// Operations received so far, in order.
    pub async fn operations(&self) -> Vec<DriverOperation> {
        self.calls.lock().await.iter().map(DriverCall::operation).collect()
    }

    async fn record(&self, call: DriverCall) -> Result<(), BgpvpnError> {
        let operation = call.operation();
        self.calls.lock().await.push(call);
        if self.failing.lock().await.contains(&operation) {
            return Err(BgpvpnError::Internal(format!("mock driver failure on {operation}")));
        }
        Ok(())
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ServiceAdapter for MockDriver {
    fn name(&self) -> &str {
        "mock-driver"
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
impl BgpvpnDriver for MockDriver {
    async fn create_connection(
        &self,
        _ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError> {
        self.record(DriverCall::Create(connection.clone())).await
    }

    async fn update_connection(
        &self,
        _ctx: &RequestContext,
        old: &Connection,
        new: &Connection,
    ) -> Result<(), BgpvpnError> {
        self.record(DriverCall::Update {
            old: old.clone(),
            new: new.clone(),
        })
        .await
    }

    async fn delete_connection(
        &self,
        _ctx: &RequestContext,
        connection: &Connection,
    ) -> Result<(), BgpvpnError> {
        self.record(DriverCall::Delete(connection.clone())).await
    }

    async fn notify_port_updated(
        &self,
        _ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        self.record(DriverCall::PortUpdated(port.clone())).await
    }

    async fn remove_port_from_bgpvpn_agent(
        &self,
        _ctx: &RequestContext,
        port: &Port,
    ) -> Result<(), BgpvpnError> {
        self.record(DriverCall::PortRemoved(port.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn port() -> Port {
        Port {
            id: Uuid::new_v4(),
            network_id: Uuid::new_v4(),
            device_id: "vm-1".to_string(),
            device_owner: "compute:nova".to_string(),
            mac_address: "fa:16:3e:00:00:01".to_string(),
            fixed_ips: vec!["10.0.0.5".to_string()],
        }
    }

    #[tokio::test]
    async fn records_calls_in_order() {
        let driver = MockDriver::new();
        let ctx = RequestContext::new("t");
        let p = port();
        driver.notify_port_updated(&ctx, &p).await.unwrap();
        driver.remove_port_from_bgpvpn_agent(&ctx, &p).await.unwrap();
        assert_eq!(
            driver.calls().await,
            vec![DriverCall::PortUpdated(p.clone()), DriverCall::PortRemoved(p)]
        );
    }

    #[tokio::test]
    async fn injected_failure_is_recorded_and_returned() {
        let driver = MockDriver::new();
        driver.fail_on(DriverOperation::NotifyPortUpdated).await;
        let ctx = RequestContext::new("t");
        assert!(driver.notify_port_updated(&ctx, &port()).await.is_err());
        assert_eq!(driver.operations().await, vec![DriverOperation::NotifyPortUpdated]);

        driver.recover(DriverOperation::NotifyPortUpdated).await;
        assert!(driver.notify_port_updated(&ctx, &port()).await.is_ok());
    }
}
