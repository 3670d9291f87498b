// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is
//! reported at startup instead of silently falling back to a default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level service configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BgpvpnConfig {
    /// Service plugin settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Connection store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Free-form settings keyed by driver name, handed to the driver
    /// factory that matches `service.driver`.
    #[serde(default)]
    pub drivers: BTreeMap<String, toml::Table>,
}

impl BgpvpnConfig {
    /// Settings for the configured driver, empty when none were given.
    pub fn active_driver_settings(&self) -> toml::Table {
        self.drivers
            .get(&self.service.driver)
            .cloned()
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Name of the driver that receives lifecycle notifications.
    #[serde(default = "default_driver")]
    pub driver: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
        }
    }
}

fn default_driver() -> String {
    "dummy".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable write-ahead logging.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "bgpvpn.db".to_string()
}

fn default_wal_mode() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default filter level (trace, debug, info, warn, error).
    /// `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
