// SPDX-FileCopyrightText: 2026 BGPVPN Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Connection lifecycle tests over mock collaborators.

use bgpvpn_core::{
    BgpvpnError, ConnectionFilter, ConnectionType, DriverOperation, ErrorKind, Port,
    RequestContext, RouteTarget,
};
use bgpvpn_test_utils::{DriverCall, TestHarness};
use serde_json::json;
use uuid::Uuid;

fn port(network_id: Uuid) -> Port {
    Port {
        id: Uuid::new_v4(),
        network_id,
        device_id: "vm-1".to_string(),
        device_owner: "compute:nova".to_string(),
        mac_address: "fa:16:3e:12:34:56".to_string(),
        fixed_ips: vec!["10.0.0.4".to_string()],
    }
}

#[tokio::test]
async fn create_fills_defaults_and_notifies_driver() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness.create(json!({ "name": "vpn1" })).await.unwrap();

    assert_eq!(created.tenant_id, "test-tenant");
    assert_eq!(created.connection_type, ConnectionType::L3);
    assert!(created.route_targets.is_empty());
    assert_eq!(created.import_targets, None);
    assert!(created.auto_aggregate);
    assert_eq!(harness.driver.calls().await, vec![DriverCall::Create(created)]);
}

#[tokio::test]
async fn create_reports_every_invalid_field_without_side_effects() {
    let harness = TestHarness::new().await.unwrap();
    let err = harness
        .create(json!({
            "type": "l4",
            "route_targets": ["64512:1", "64512:1"],
            "network_id": "not-a-uuid"
        }))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), 400);
    let fields: Vec<&str> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["network_id", "type", "route_targets"]);
    assert!(err.field_errors()[2].message.contains("64512:1"));
    assert!(harness.memory.as_ref().unwrap().records().await.is_empty());
    assert!(harness.driver.calls().await.is_empty());
}

#[tokio::test]
async fn scalar_route_target_is_wrapped_into_a_list() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness
        .create(json!({ "route_targets": "65000:7" }))
        .await
        .unwrap();
    assert_eq!(created.route_targets, vec![RouteTarget::new(65000, 7)]);
}

#[tokio::test]
async fn store_failure_aborts_before_driver() {
    let harness = TestHarness::new().await.unwrap();
    harness.memory.as_ref().unwrap().set_fail_writes(true);

    let err = harness.create(json!({ "name": "x" })).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Persistence);
    assert!(harness.driver.calls().await.is_empty());
}

#[tokio::test]
async fn driver_failure_on_create_keeps_the_record() {
    let harness = TestHarness::builder()
        .with_failing_driver(DriverOperation::CreateConnection)
        .build()
        .await
        .unwrap();

    let err = harness.create(json!({ "name": "orphan" })).await.unwrap_err();
    let BgpvpnError::Driver {
        operation,
        connection_id,
        ..
    } = &err
    else {
        panic!("expected driver error, got {err:?}");
    };
    assert_eq!(*operation, DriverOperation::CreateConnection);

    let id = connection_id.unwrap();
    let stored = harness.get(id).await.unwrap();
    assert_eq!(stored.name, "orphan");
}

#[tokio::test]
async fn type_is_immutable_but_other_fields_update() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness
        .create(json!({ "type": "l3", "route_targets": ["1:1"] }))
        .await
        .unwrap();

    let err = harness
        .update(created.id, json!({ "type": "l2" }))
        .await
        .unwrap_err();
    assert!(matches!(&err, BgpvpnError::ImmutableField { field } if field == "type"));
    assert_eq!(err.status_code(), 400);

    let network_id = Uuid::new_v4();
    let updated = harness
        .update(
            created.id,
            json!({
                "network_id": network_id.to_string(),
                "name": "renamed",
                "route_targets": ["2:2", "3:3"],
                "import_targets": ["4:4"],
                "export_targets": [],
                "auto_aggregate": "false"
            }),
        )
        .await
        .unwrap();
    assert_eq!(updated.network_id, Some(network_id));
    assert_eq!(updated.name, "renamed");
    assert_eq!(updated.route_targets, vec![RouteTarget::new(2, 2), RouteTarget::new(3, 3)]);
    assert_eq!(updated.import_targets, Some(vec![RouteTarget::new(4, 4)]));
    assert_eq!(updated.export_targets, Some(vec![]));
    assert!(!updated.auto_aggregate);
    assert_eq!(updated.connection_type, ConnectionType::L3);
}

#[tokio::test]
async fn update_passes_old_and_new_state_to_driver() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness
        .create(json!({ "route_targets": ["1:1", "1:2"] }))
        .await
        .unwrap();
    let updated = harness
        .update(created.id, json!({ "route_targets": ["1:2"] }))
        .await
        .unwrap();

    let calls = harness.driver.calls().await;
    assert_eq!(
        calls[1],
        DriverCall::Update {
            old: created,
            new: updated
        }
    );
}

#[tokio::test]
async fn update_of_unknown_connection_is_not_found() {
    let harness = TestHarness::new().await.unwrap();
    let err = harness
        .update(Uuid::new_v4(), json!({ "type": "l2" }))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn null_clears_optional_targets() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness
        .create(json!({ "import_targets": ["9:9"] }))
        .await
        .unwrap();
    let updated = harness
        .update(created.id, json!({ "import_targets": null }))
        .await
        .unwrap();
    assert_eq!(updated.import_targets, None);
}

#[tokio::test]
async fn driver_failure_on_update_keeps_new_state() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness.create(json!({ "name": "a" })).await.unwrap();
    harness.driver.fail_on(DriverOperation::UpdateConnection).await;

    let err = harness
        .update(created.id, json!({ "name": "b" }))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Driver);
    assert_eq!(harness.get(created.id).await.unwrap().name, "b");
}

#[tokio::test]
async fn driver_failure_on_delete_does_not_restore_record() {
    let harness = TestHarness::builder()
        .with_failing_driver(DriverOperation::DeleteConnection)
        .build()
        .await
        .unwrap();
    let created = harness.create(json!({})).await.unwrap();

    let err = harness.delete(created.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Driver);
    assert_eq!(harness.get(created.id).await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn network_guard_follows_connection_lifetime() {
    let harness = TestHarness::new().await.unwrap();
    let network_id = Uuid::new_v4();
    let created = harness
        .create(json!({ "network_id": network_id.to_string() }))
        .await
        .unwrap();

    let err = harness
        .plugin
        .prevent_dependent_deletion(&harness.ctx, network_id)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 409);
    assert!(matches!(
        &err,
        BgpvpnError::ReferencedResource { connections, .. } if connections == &vec![created.id]
    ));

    harness
        .plugin
        .prevent_dependent_deletion(&harness.ctx, Uuid::new_v4())
        .await
        .unwrap();

    harness.delete(created.id).await.unwrap();
    harness
        .plugin
        .prevent_dependent_deletion(&harness.ctx, network_id)
        .await
        .unwrap();
}

#[tokio::test]
async fn port_events_are_forwarded_unchanged() {
    let harness = TestHarness::new().await.unwrap();
    let p = port(Uuid::new_v4());
    harness.plugin.notify_port_updated(&harness.ctx, &p).await.unwrap();
    harness
        .plugin
        .remove_port_from_bgpvpn_agent(&harness.ctx, &p)
        .await
        .unwrap();

    assert_eq!(
        harness.driver.calls().await,
        vec![DriverCall::PortUpdated(p.clone()), DriverCall::PortRemoved(p)]
    );
    assert!(harness.memory.as_ref().unwrap().records().await.is_empty());
}

#[tokio::test]
async fn port_failure_is_a_driver_error() {
    let harness = TestHarness::builder()
        .with_failing_driver(DriverOperation::RemovePortFromBgpvpnAgent)
        .build()
        .await
        .unwrap();
    let err = harness
        .plugin
        .remove_port_from_bgpvpn_agent(&harness.ctx, &port(Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        BgpvpnError::Driver {
            operation: DriverOperation::RemovePortFromBgpvpnAgent,
            connection_id: None,
            ..
        }
    ));
}

#[tokio::test]
async fn list_filters_by_tenant_and_network() {
    let harness = TestHarness::new().await.unwrap();
    let network_id = Uuid::new_v4();
    let a = harness
        .create(json!({ "network_id": network_id.to_string() }))
        .await
        .unwrap();
    let other = RequestContext::new("other-tenant");
    let b = harness
        .plugin
        .create_connection(&other, &bgpvpn_test_utils::harness::payload(json!({})))
        .await
        .unwrap();

    let all = harness
        .plugin
        .list_connections(&harness.ctx, &ConnectionFilter::default())
        .await
        .unwrap();
    assert_eq!(all, vec![a.clone(), b.clone()]);

    let mine = ConnectionFilter {
        tenant_id: Some("other-tenant".to_string()),
        ..ConnectionFilter::default()
    };
    assert_eq!(
        harness.plugin.list_connections(&harness.ctx, &mine).await.unwrap(),
        vec![b]
    );
    assert_eq!(
        harness
            .plugin
            .list_connections(&harness.ctx, &ConnectionFilter::by_network(network_id))
            .await
            .unwrap(),
        vec![a]
    );
}

#[tokio::test]
async fn render_projects_requested_fields() {
    let harness = TestHarness::new().await.unwrap();
    let created = harness
        .create(json!({ "name": "vpn1", "route_targets": ["64512:100"] }))
        .await
        .unwrap();

    let full = harness.plugin.render(&created, None).unwrap();
    assert_eq!(full.len(), 9);
    assert_eq!(full["type"], "l3");
    assert_eq!(full["route_targets"], json!(["64512:100"]));
    assert_eq!(full["id"], created.id.to_string());

    let wanted = vec!["id".to_string(), "name".to_string()];
    let partial = harness.plugin.render(&created, Some(wanted.as_slice())).unwrap();
    assert_eq!(partial.len(), 2);
    assert_eq!(partial["name"], "vpn1");
}

#[tokio::test]
async fn plugin_metadata() {
    let harness = TestHarness::new().await.unwrap();
    assert_eq!(harness.plugin.plugin_name(), "BGPVPN");
    assert_eq!(harness.plugin.plugin_type(), "BGPVPN");
    assert_eq!(
        harness.plugin.plugin_description(),
        "Neutron BGP VPN connection Service Plugin"
    );
    assert_eq!(harness.plugin.supported_extension_aliases(), ["bgpvpn"]);
}

#[tokio::test]
async fn end_to_end_over_sqlite() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();

    let created = harness
        .create(json!({
            "name": "vpn1",
            "type": "l3",
            "route_targets": ["64512:100", "64512:200"],
            "auto_aggregate": true
        }))
        .await
        .unwrap();
    assert_eq!(created.name, "vpn1");
    assert_eq!(
        created.route_targets,
        vec![RouteTarget::new(64512, 100), RouteTarget::new(64512, 200)]
    );
    assert_eq!(harness.get(created.id).await.unwrap(), created);

    let updated = harness
        .update(created.id, json!({ "route_targets": ["64512:100"] }))
        .await
        .unwrap();
    assert_eq!(updated.route_targets, vec![RouteTarget::new(64512, 100)]);
    assert_eq!(updated.import_targets, created.import_targets);
    assert_eq!(updated.export_targets, created.export_targets);

    harness.delete(created.id).await.unwrap();
    assert_eq!(
        harness.get(created.id).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        harness.driver.operations().await,
        vec![
            DriverOperation::CreateConnection,
            DriverOperation::UpdateConnection,
            DriverOperation::DeleteConnection
        ]
    );
}

#[tokio::test]
async fn non_ascii_route_target_is_a_validation_error() {
    let harness = TestHarness::new().await.unwrap();
    let err = harness
        .create(json!({ "route_targets": ["1\u{0660}:0"] }))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.status_code(), 400);
    assert_eq!(err.field_errors()[0].field, "route_targets");
    assert!(harness.driver.calls().await.is_empty());
}

#[tokio::test]
async fn delete_of_unknown_connection_is_not_found() {
    let harness = TestHarness::new().await.unwrap();
    let err = harness.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(harness.driver.calls().await.is_empty());
}

async fn route_target_update_keeps_import_and_export(harness: TestHarness) {
    let created = harness
        .create(json!({
            "route_targets": ["64512:100", "64512:200"],
            "import_targets": ["64512:300"],
            "export_targets": ["64512:400", "64512:500"]
        }))
        .await
        .unwrap();

    let updated = harness
        .update(created.id, json!({ "route_targets": ["64512:100"] }))
        .await
        .unwrap();
    assert_eq!(updated.route_targets, vec![RouteTarget::new(64512, 100)]);
    assert_eq!(updated.import_targets, Some(vec![RouteTarget::new(64512, 300)]));
    assert_eq!(
        updated.export_targets,
        Some(vec![RouteTarget::new(64512, 400), RouteTarget::new(64512, 500)])
    );
    assert_eq!(harness.get(created.id).await.unwrap(), updated);
}

#[tokio::test]
async fn route_target_update_keeps_import_and_export_in_memory() {
    route_target_update_keeps_import_and_export(TestHarness::new().await.unwrap()).await;
}

#[tokio::test]
async fn route_target_update_keeps_import_and_export_over_sqlite() {
    let harness = TestHarness::builder().with_sqlite().build().await.unwrap();
    route_target_update_keeps_import_and_export(harness).await;
}
