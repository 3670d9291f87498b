// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in driver catalog.

use bgpvpn_core::types::AdapterType;
use bgpvpn_core::BgpvpnError;

use crate::drivers::dummy::{DummyDriverFactory, DUMMY_DRIVER};
use crate::manifest::DriverManifest;
use crate::registry::{DriverFactory, DriverRegistry};

/// Manifests of every driver compiled into this build.
pub fn builtin_catalog() -> Vec<DriverManifest> {
    vec![DriverManifest {
        name: DUMMY_DRIVER.to_string(),
        version: "0.1.0".to_string(),
        description: "Accepts every lifecycle notification and logs it".to_string(),
        adapter_type: AdapterType::Driver,
        author: Some("BGPVPN Contributors".to_string()),
        capabilities: vec![
            "l3".to_string(),
            "l2".to_string(),
            "port_events".to_string(),
        ],
        min_bgpvpn_version: Some("0.1.0".to_string()),
        config_keys: vec![],
    }]
}

fn builtin_factory(name: &str) -> Option<Box<dyn DriverFactory>> {
    match name {
        DUMMY_DRIVER => Some(Box::new(DummyDriverFactory)),
        _ => None,
    }
}

/// Registry populated with [`builtin_catalog`] and the matching factories.
pub fn builtin_registry() -> Result<DriverRegistry, BgpvpnError> {
    let mut registry = DriverRegistry::new();
    for manifest in builtin_catalog() {
        let factory = builtin_factory(&manifest.name);
        registry.register(manifest, factory)?;
    }
    Ok(registry)
}
