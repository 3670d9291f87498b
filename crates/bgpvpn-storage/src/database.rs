// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle with PRAGMA setup and migrations.
//!
//! All statements are serialized through tokio-rusqlite's single background
//! thread. Do NOT open additional connections for writes.

use bgpvpn_core::BgpvpnError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Map a tokio-rusqlite failure to a persistence error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BgpvpnError {
    BgpvpnError::Persistence {
        source: Box::new(e),
    }
}

/// Open SQLite database serving a single store.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, migrate it, and
    /// configure the serving connection.
    ///
    /// Migrations run on a short-lived blocking connection before the
    /// serving connection is opened, so `path` must name a file.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, BgpvpnError> {
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), BgpvpnError> {
            let mut conn = rusqlite::Connection::open(&migrate_path).map_err(|e| {
                BgpvpnError::Persistence {
                    source: Box::new(e),
                }
            })?;
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")
                    .map_err(|e| BgpvpnError::Persistence {
                        source: Box::new(e),
                    })?;
            }
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| BgpvpnError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| BgpvpnError::Persistence {
                source: Box::new(e),
            })?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA foreign_keys = ON;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The serving connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}
