// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory connection store.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use bgpvpn_core::types::{AdapterType, HealthStatus};
use bgpvpn_core::{
    BgpvpnError, Connection, ConnectionFilter, ConnectionPatch, ConnectionStore, ServiceAdapter,
};

/// Vec-backed store keeping creation order. When `fail_writes` is set,
/// `create`, `update`, and `delete` fail with a persistence error.
pub struct MemoryStore {
    records: Arc<Mutex<Vec<Connection>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every stored record.
    pub async fn records(&self) -> Vec<Connection> {
        self.records.lock().await.clone()
    }

    fn check_writable(&self) -> Result<(), BgpvpnError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BgpvpnError::Persistence {
                source: "injected store failure".into(),
            });
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(id: Uuid) -> BgpvpnError {
    BgpvpnError::NotFound {
        resource: "bgpvpn_connection".to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl ServiceAdapter for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BgpvpnError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConnectionStore for MemoryStore {
    async fn initialize(&self) -> Result<(), BgpvpnError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), BgpvpnError> {
        Ok(())
    }

    async fn create(&self, connection: &Connection) -> Result<Connection, BgpvpnError> {
        self.check_writable()?;
        let mut records = self.records.lock().await;
        if records.iter().any(|c| c.id == connection.id) {
            return Err(BgpvpnError::Persistence {
                source: format!("duplicate id {}", connection.id).into(),
            });
        }
        records.push(connection.clone());
        Ok(connection.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Connection>, BgpvpnError> {
        Ok(self.records.lock().await.iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, BgpvpnError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, patch: &ConnectionPatch) -> Result<Connection, BgpvpnError> {
        self.check_writable()?;
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;
        *record = patch.apply(record);
        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), BgpvpnError> {
        self.check_writable()?;
        let mut records = self.records.lock().await;
        let before = records.len();
        records.retain(|c| c.id != id);
        if records.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }
}
