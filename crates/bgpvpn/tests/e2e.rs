// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests wiring the service from configuration: built-in driver,
//! SQLite store in a temp directory, and the lifecycle plugin.

use std::sync::Arc;

use bgpvpn_core::{
    ConnectionFilter, ConnectionStore, ErrorKind, RequestContext, RouteTarget, ServiceAdapter,
};
use bgpvpn_extension::ValidatorRegistry;
use bgpvpn_service::BgpvpnPlugin;
use bgpvpn_storage::SqliteStore;
use bgpvpn_test_utils::harness::payload;
use serde_json::json;

async fn wire(toml: &str) -> (BgpvpnPlugin, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let mut config = bgpvpn_config::load_and_validate_str(toml).unwrap();
    config.storage.database_path = dir.path().join("e2e.db").display().to_string();

    let registry = bgpvpn_plugin::builtin_registry().unwrap();
    bgpvpn_config::validate_driver(&config, &registry.names()).unwrap();
    let driver = registry
        .load(&config.service.driver, &config.active_driver_settings())
        .unwrap();

    let store = Arc::new(SqliteStore::new(config.storage.clone()));
    store.initialize().await.unwrap();
    let validators = Arc::new(ValidatorRegistry::with_builtins().unwrap());
    let plugin = BgpvpnPlugin::new(store, driver, validators).unwrap();
    (plugin, dir)
}

#[tokio::test]
async fn configured_dummy_driver_runs_full_lifecycle() {
    let (plugin, _dir) = wire("[service]\ndriver = \"dummy\"\n").await;
    let ctx = RequestContext::new("tenant-a");

    let created = plugin
        .create_connection(
            &ctx,
            &payload(json!({
                "name": "vpn1",
                "type": "l3",
                "route_targets": ["64512:100", "64512:200"],
                "auto_aggregate": true
            })),
        )
        .await
        .unwrap();
    assert_eq!(plugin.driver().name(), "dummy");
    assert_eq!(created.import_targets, None);
    assert_eq!(created.export_targets, None);

    let updated = plugin
        .update_connection(&ctx, created.id, &payload(json!({ "route_targets": ["64512:100"] })))
        .await
        .unwrap();
    assert_eq!(updated.route_targets, vec![RouteTarget::new(64512, 100)]);

    let listed = plugin
        .list_connections(&ctx, &ConnectionFilter::default())
        .await
        .unwrap();
    assert_eq!(listed, vec![updated]);

    plugin.delete_connection(&ctx, created.id).await.unwrap();
    let err = plugin.get_connection(&ctx, created.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn driver_settings_reach_the_factory() {
    let (plugin, _dir) =
        wire("[service]\ndriver = \"dummy\"\n\n[drivers.dummy]\nverbose = true\n").await;
    assert_eq!(plugin.driver().name(), "dummy");
}

#[tokio::test]
async fn network_guard_over_sqlite() {
    let (plugin, _dir) = wire("").await;
    let ctx = RequestContext::admin();
    let network_id = uuid::Uuid::new_v4();
    let created = plugin
        .create_connection(
            &ctx,
            &payload(json!({ "network_id": network_id.to_string(), "type": "l2" })),
        )
        .await
        .unwrap();

    let err = plugin
        .prevent_dependent_deletion(&ctx, network_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ReferencedResource);

    plugin.delete_connection(&ctx, created.id).await.unwrap();
    plugin.prevent_dependent_deletion(&ctx, network_id).await.unwrap();
}

#[test]
fn unknown_driver_name_gets_a_suggestion() {
    let config = bgpvpn_config::load_and_validate_str("[service]\ndriver = \"dumy\"\n").unwrap();
    let registry = bgpvpn_plugin::builtin_registry().unwrap();
    let err = bgpvpn_config::validate_driver(&config, &registry.names()).unwrap_err();
    assert!(matches!(
        err,
        bgpvpn_config::ConfigError::UnknownDriver { suggestion: Some(ref s), .. } if s == "dummy"
    ));
}
