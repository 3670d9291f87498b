// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the ConnectionStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;
use uuid::Uuid;

use bgpvpn_config::model::StorageConfig;
use bgpvpn_core::{
    AdapterType, BgpvpnError, Connection, ConnectionFilter, ConnectionPatch, ConnectionStore,
    HealthStatus, ServiceAdapter,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed connection store.
///
/// The database is opened on the first call to
/// [`ConnectionStore::initialize`]; every other operation fails until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, BgpvpnError> {
        self.db.get().ok_or_else(|| BgpvpnError::Persistence {
            source: "store not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(&self, db: &Database) -> Result<(), BgpvpnError> {
        if !self.config.wal_mode {
            return Ok(());
        }
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl ServiceAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, BgpvpnError> {
        let Ok(db) = self.db() else {
            return Ok(HealthStatus::Unhealthy("store not initialized".to_string()));
        };
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ConnectionStore for SqliteStore {
    async fn initialize(&self) -> Result<(), BgpvpnError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BgpvpnError::Persistence {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), BgpvpnError> {
        let db = self.db()?;
        self.checkpoint(db).await
    }

    async fn create(&self, connection: &Connection) -> Result<Connection, BgpvpnError> {
        queries::connections::insert_connection(self.db()?, connection).await?;
        Ok(connection.clone())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Connection>, BgpvpnError> {
        queries::connections::get_connection(self.db()?, id).await
    }

    async fn list(&self, filter: &ConnectionFilter) -> Result<Vec<Connection>, BgpvpnError> {
        queries::connections::list_connections(self.db()?, filter).await
    }

    async fn update(&self, id: Uuid, patch: &ConnectionPatch) -> Result<Connection, BgpvpnError> {
        queries::connections::update_connection(self.db()?, id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), BgpvpnError> {
        queries::connections::delete_connection(self.db()?, id).await
    }
}
