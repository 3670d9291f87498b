// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bgpvpn resources` and `bgpvpn drivers`.

use std::fmt::Write;

use bgpvpn_core::BgpvpnError;
use bgpvpn_extension::{BgpvpnExtension, ValidatorRegistry};
use bgpvpn_plugin::DriverRegistry;

/// Resource information of the extension, pretty-printed.
pub fn resources_json() -> Result<String, BgpvpnError> {
    let validators = ValidatorRegistry::with_builtins()?;
    let extension = BgpvpnExtension::load(&validators)?;
    let document = serde_json::json!({
        "extension": extension.descriptor(),
        "resources": extension.resource_info(),
    });
    serde_json::to_string_pretty(&document)
        .map_err(|e| BgpvpnError::Internal(format!("cannot serialize resources: {e}")))
}

/// One line per registered driver, sorted by name.
pub fn drivers_table(registry: &DriverRegistry) -> String {
    let mut out = String::new();
    for entry in registry.list_all() {
        let m = &entry.manifest;
        let availability = if entry.factory.is_some() { "" } else { " (catalog only)" };
        let _ = writeln!(
            out,
            "{:<12} {:<8} {}{availability}",
            m.name, m.version, m.description
        );
        if !m.capabilities.is_empty() {
            let _ = writeln!(out, "{:<12} capabilities: {}", "", m.capabilities.join(", "));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resources_document_describes_connections() {
        let json: serde_json::Value = serde_json::from_str(&resources_json().unwrap()).unwrap();
        assert_eq!(json["extension"]["alias"], "bgpvpn");
        let resources = json["resources"].as_array().unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0]["collection"], "bgpvpn_connections");
        assert_eq!(resources[0]["attributes"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn drivers_table_lists_builtin_dummy() {
        let registry = bgpvpn_plugin::builtin_registry().unwrap();
        let table = drivers_table(&registry);
        assert!(table.starts_with("dummy"));
        assert!(table.contains("capabilities: l3, l2, port_events"));
        assert!(!table.contains("catalog only"));
    }
}
