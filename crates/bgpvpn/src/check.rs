// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bgpvpn check` command implementation.
//!
//! Performs the same wiring as service startup: selects the configured
//! driver, opens the connection store, loads the extension schema, and
//! reports the health of each adapter.

use std::sync::Arc;

use bgpvpn_config::BgpvpnConfig;
use bgpvpn_core::types::HealthStatus;
use bgpvpn_core::{BgpvpnError, ConnectionStore, ServiceAdapter};
use bgpvpn_extension::ValidatorRegistry;
use bgpvpn_plugin::DriverRegistry;
use bgpvpn_service::BgpvpnPlugin;
use bgpvpn_storage::SqliteStore;
use tracing::info;

/// Health of one wired adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterReport {
    pub role: &'static str,
    pub name: String,
    pub version: semver::Version,
    pub status: HealthStatus,
}

/// Wire the service from `config` and collect adapter health.
///
/// The store is closed again before returning.
pub async fn check_environment(
    config: &BgpvpnConfig,
    registry: &DriverRegistry,
) -> Result<Vec<AdapterReport>, BgpvpnError> {
    let driver = registry.load(&config.service.driver, &config.active_driver_settings())?;

    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await?;

    let validators = Arc::new(ValidatorRegistry::with_builtins()?);
    let plugin = BgpvpnPlugin::new(store.clone(), driver.clone(), validators)?;
    info!(
        plugin = plugin.plugin_name(),
        aliases = ?plugin.supported_extension_aliases(),
        "service wiring complete"
    );

    let reports = vec![
        report("driver", driver.as_ref()).await?,
        report("store", store.as_ref()).await?,
    ];
    store.close().await?;
    Ok(reports)
}

async fn report(
    role: &'static str,
    adapter: &dyn ServiceAdapter,
) -> Result<AdapterReport, BgpvpnError> {
    Ok(AdapterReport {
        role,
        name: adapter.name().to_string(),
        version: adapter.version(),
        status: adapter.health_check().await?,
    })
}

/// Run `bgpvpn check` and print one line per adapter.
pub async fn run_check(
    config: &BgpvpnConfig,
    registry: &DriverRegistry,
) -> Result<(), BgpvpnError> {
    let reports = check_environment(config, registry).await?;

    println!();
    println!("  bgpvpn check");
    println!("  {}", "-".repeat(50));
    let mut unhealthy = 0;
    for r in &reports {
        let status = match &r.status {
            HealthStatus::Healthy => "healthy".to_string(),
            HealthStatus::Degraded(reason) => format!("degraded: {reason}"),
            HealthStatus::Unhealthy(reason) => {
                unhealthy += 1;
                format!("unhealthy: {reason}")
            }
        };
        println!("  {:<8} {:<12} {:<8} {status}", r.role, r.name, r.version);
    }
    println!();

    if unhealthy > 0 {
        return Err(BgpvpnError::Internal(format!(
            "{unhealthy} adapter(s) reported unhealthy"
        )));
    }
    Ok(())
}
