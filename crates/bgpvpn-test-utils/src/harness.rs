// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end lifecycle tests.
//!
//! `TestHarness` wires a [`BgpvpnPlugin`] over a [`MockDriver`] and either
//! a [`MemoryStore`] or a SQLite store in a temp directory.

use std::sync::Arc;

use bgpvpn_config::model::StorageConfig;
use bgpvpn_core::{BgpvpnError, Connection, ConnectionStore, DriverOperation, RequestContext};
use bgpvpn_extension::ValidatorRegistry;
use bgpvpn_service::BgpvpnPlugin;
use bgpvpn_storage::SqliteStore;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::memory_store::MemoryStore;
use crate::mock_driver::MockDriver;

/// Builder for test environments.
pub struct TestHarnessBuilder {
    sqlite: bool,
    failing: Vec<DriverOperation>,
    tenant: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            sqlite: false,
            failing: Vec::new(),
            tenant: "test-tenant".to_string(),
        }
    }

    /// Use a SQLite store in a temp directory instead of memory.
    pub fn with_sqlite(mut self) -> Self {
        self.sqlite = true;
        self
    }

    /// Make the mock driver fail `operation`.
    pub fn with_failing_driver(mut self, operation: DriverOperation) -> Self {
        self.failing.push(operation);
        self
    }

    /// Tenant of the default request context.
    pub fn with_tenant(mut self, tenant: &str) -> Self {
        self.tenant = tenant.to_string();
        self
    }

    pub async fn build(self) -> Result<TestHarness, BgpvpnError> {
        let driver = Arc::new(MockDriver::new());
        for operation in self.failing {
            driver.fail_on(operation).await;
        }

        let mut memory = None;
        let mut temp_dir = None;
        let store: Arc<dyn ConnectionStore> = if self.sqlite {
            let dir = tempfile::TempDir::new().map_err(|e| BgpvpnError::Persistence {
                source: Box::new(e),
            })?;
            let database_path = dir.path().join("test.db").display().to_string();
            temp_dir = Some(dir);
            Arc::new(SqliteStore::new(StorageConfig {
                database_path,
                wal_mode: true,
            }))
        } else {
            let store = Arc::new(MemoryStore::new());
            memory = Some(store.clone());
            store
        };
        store.initialize().await?;

        let validators = Arc::new(ValidatorRegistry::with_builtins()?);
        let plugin = BgpvpnPlugin::new(store.clone(), driver.clone(), validators)?;

        Ok(TestHarness {
            plugin,
            driver,
            store,
            memory,
            ctx: RequestContext::new(self.tenant),
            _temp_dir: temp_dir,
        })
    }
}

/// A wired plugin with mock collaborators.
pub struct TestHarness {
    pub plugin: BgpvpnPlugin,
    pub driver: Arc<MockDriver>,
    pub store: Arc<dyn ConnectionStore>,
    /// Set when the harness runs on [`MemoryStore`].
    pub memory: Option<Arc<MemoryStore>>,
    /// Default request context.
    pub ctx: RequestContext,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Memory-backed harness with a well-behaved driver.
    pub async fn new() -> Result<Self, BgpvpnError> {
        Self::builder().build().await
    }

    pub async fn create(&self, body: Value) -> Result<Connection, BgpvpnError> {
        self.plugin.create_connection(&self.ctx, &payload(body)).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Connection, BgpvpnError> {
        self.plugin.get_connection(&self.ctx, id).await
    }

    pub async fn update(&self, id: Uuid, body: Value) -> Result<Connection, BgpvpnError> {
        self.plugin.update_connection(&self.ctx, id, &payload(body)).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), BgpvpnError> {
        self.plugin.delete_connection(&self.ctx, id).await
    }
}

/// Object payload from a `json!` literal. Non-objects become empty bodies.
pub fn payload(body: Value) -> Map<String, Value> {
    match body {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn harness_builds_over_memory() {
        let harness = TestHarness::new().await.unwrap();
        assert!(harness.memory.is_some());
        let created = harness.create(json!({ "name": "h" })).await.unwrap();
        assert_eq!(created.tenant_id, "test-tenant");
        assert_eq!(harness.driver.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn harness_builds_over_sqlite() {
        let harness = TestHarness::builder()
            .with_sqlite()
            .with_tenant("acme")
            .build()
            .await
            .unwrap();
        assert!(harness.memory.is_none());
        let created = harness.create(json!({})).await.unwrap();
        assert_eq!(harness.get(created.id).await.unwrap().tenant_id, "acme");
    }
}
