// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver registry.
//!
//! Stores [`DriverEntry`] records keyed by driver name. Each entry holds a
//! manifest and, for drivers that can actually be instantiated, a factory.

use std::collections::HashMap;
use std::sync::Arc;

use bgpvpn_core::{BgpvpnDriver, BgpvpnError};
use tracing::info;

use crate::manifest::DriverManifest;

/// Creates driver instances from their `[drivers.<name>]` settings.
pub trait DriverFactory: Send + Sync {
    fn create(&self, settings: &toml::Table) -> Result<Arc<dyn BgpvpnDriver>, BgpvpnError>;
}

/// A single entry in the driver registry.
pub struct DriverEntry {
    pub manifest: DriverManifest,
    /// `None` for catalog-only entries.
    pub factory: Option<Box<dyn DriverFactory>>,
}

impl std::fmt::Debug for DriverEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverEntry")
            .field("manifest", &self.manifest)
            .field("factory", &self.factory.is_some())
            .finish()
    }
}

/// Registry of compiled-in drivers.
#[derive(Debug, Default)]
pub struct DriverRegistry {
    entries: HashMap<String, DriverEntry>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver. A later registration under the same name replaces
    /// the earlier one.
    pub fn register(
        &mut self,
        manifest: DriverManifest,
        factory: Option<Box<dyn DriverFactory>>,
    ) -> Result<(), BgpvpnError> {
        manifest.validate()?;
        self.entries
            .insert(manifest.name.clone(), DriverEntry { manifest, factory });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&DriverEntry> {
        self.entries.get(name)
    }

    /// Registered driver names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All entries, sorted by name.
    pub fn list_all(&self) -> Vec<&DriverEntry> {
        let mut entries: Vec<&DriverEntry> = self.entries.values().collect();
        entries.sort_by(|a, b| a.manifest.name.cmp(&b.manifest.name));
        entries
    }

    /// Instantiate the driver registered as `name`.
    ///
    /// Fails with [`BgpvpnError::DriverNotFound`] when no entry exists, and
    /// with [`BgpvpnError::Config`] when the entry cannot be instantiated in
    /// this build.
    pub fn load(
        &self,
        name: &str,
        settings: &toml::Table,
    ) -> Result<Arc<dyn BgpvpnDriver>, BgpvpnError> {
        let entry = self
            .entries
            .get(name)
            .ok_or_else(|| BgpvpnError::DriverNotFound {
                name: name.to_string(),
                available: self.names().into_iter().map(str::to_string).collect(),
            })?;

        let running = semver::Version::parse(env!("CARGO_PKG_VERSION"))
            .map_err(|e| BgpvpnError::Internal(format!("invalid crate version: {e}")))?;
        if !entry.manifest.is_compatible(&running) {
            return Err(BgpvpnError::Config(format!(
                "driver `{name}` requires version {} or newer, running {running}",
                entry.manifest.min_bgpvpn_version.as_deref().unwrap_or("?")
            )));
        }

        let factory = entry.factory.as_ref().ok_or_else(|| {
            BgpvpnError::Config(format!("driver `{name}` is not available in this build"))
        })?;
        let driver = factory.create(settings)?;
        info!(driver = name, version = %driver.version(), "driver selected");
        Ok(driver)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
