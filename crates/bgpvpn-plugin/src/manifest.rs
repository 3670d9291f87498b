// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Driver manifests: metadata describing a compiled-in driver.

use bgpvpn_core::types::AdapterType;
use bgpvpn_core::BgpvpnError;
use serde::{Deserialize, Serialize};

/// Metadata describing a driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverManifest {
    /// Unique name used in `service.driver`.
    pub name: String,
    /// Semantic version string.
    pub version: String,
    pub description: String,
    pub adapter_type: AdapterType,
    pub author: Option<String>,
    /// Capabilities the driver provides (e.g. `["l3", "port_association"]`).
    pub capabilities: Vec<String>,
    /// Minimum service version required, if any.
    pub min_bgpvpn_version: Option<String>,
    /// Keys the driver reads from `[drivers.<name>]`.
    pub config_keys: Vec<String>,
}

impl DriverManifest {
    /// Check the manifest for structural problems.
    pub fn validate(&self) -> Result<(), BgpvpnError> {
        if self.name.trim().is_empty() {
            return Err(BgpvpnError::Config(
                "driver manifest: name must not be empty".to_string(),
            ));
        }
        if self.adapter_type != AdapterType::Driver {
            return Err(BgpvpnError::Config(format!(
                "driver manifest `{}`: adapter_type must be Driver, got {}",
                self.name, self.adapter_type
            )));
        }
        semver::Version::parse(&self.version).map_err(|e| {
            BgpvpnError::Config(format!(
                "driver manifest `{}`: invalid version `{}`: {e}",
                self.name, self.version
            ))
        })?;
        if let Some(min) = &self.min_bgpvpn_version {
            semver::Version::parse(min).map_err(|e| {
                BgpvpnError::Config(format!(
                    "driver manifest `{}`: invalid min_bgpvpn_version `{min}`: {e}",
                    self.name
                ))
            })?;
        }
        Ok(())
    }

    /// Whether the driver can run inside service version `running`.
    pub fn is_compatible(&self, running: &semver::Version) -> bool {
        match self
            .min_bgpvpn_version
            .as_deref()
            .map(semver::Version::parse)
        {
            Some(Ok(min)) => *running >= min,
            Some(Err(_)) => false,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest() -> DriverManifest {
        DriverManifest {
            name: "test".to_string(),
            version: "0.1.0".to_string(),
            description: "test driver".to_string(),
            adapter_type: AdapterType::Driver,
            author: None,
            capabilities: vec![],
            min_bgpvpn_version: None,
            config_keys: vec![],
        }
    }

    #[test]
    fn valid_manifest_passes() {
        assert!(manifest().validate().is_ok());
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut m = manifest();
        m.name = String::new();
        assert!(m.validate().unwrap_err().to_string().contains("name must not be empty"));
    }

    #[test]
    fn storage_manifest_is_rejected() {
        let mut m = manifest();
        m.adapter_type = AdapterType::Storage;
        assert!(m.validate().unwrap_err().to_string().contains("must be Driver"));
    }

    #[test]
    fn bad_version_is_rejected() {
        let mut m = manifest();
        m.version = "one".to_string();
        assert!(m.validate().unwrap_err().to_string().contains("invalid version"));
    }

    #[test]
    fn compatibility_follows_min_version() {
        let mut m = manifest();
        let running = semver::Version::new(0, 2, 0);
        assert!(m.is_compatible(&running));
        m.min_bgpvpn_version = Some("0.1.5".to_string());
        assert!(m.is_compatible(&running));
        m.min_bgpvpn_version = Some("0.3.0".to_string());
        assert!(!m.is_compatible(&running));
    }
}
