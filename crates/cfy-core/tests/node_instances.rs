mod support;

use cfy_core::commands::NodeInstancesCommand;
use cfy_core::local::LocalStorage;
use serde_json::json;
use tempfile::TempDir;

use support::{FakeManager, deployment, node_instance};

fn manager() -> FakeManager {
    FakeManager {
        deployments: vec![
            deployment(json!({"id": "web"})),
            deployment(json!({"id": "db"})),
        ],
        node_instances: vec![
            node_instance(json!({
                "id": "vm_a1b2c3",
                "deployment_id": "web",
                "host_id": "vm_a1b2c3",
                "node_id": "vm",
                "state": "started",
                "runtime_properties": {"ip": "10.0.0.7"}
            })),
            node_instance(json!({
                "id": "http_web_server_d4e5f6",
                "deployment_id": "web",
                "host_id": "vm_a1b2c3",
                "node_id": "http_web_server",
                "state": "started"
            })),
            node_instance(json!({
                "id": "mysql_123abc",
                "deployment_id": "db",
                "node_id": "mysql"
            })),
        ],
        ..FakeManager::new()
    }
}

#[test]
fn get_includes_runtime_properties() {
    let details = NodeInstancesCommand::new()
        .get(&manager(), "vm_a1b2c3")
        .unwrap();

    assert_eq!(details.row.node_id, "vm");
    assert_eq!(details.row.state, "started");
    assert_eq!(details.runtime_properties["ip"], json!("10.0.0.7"));
}

#[test]
fn get_unknown_instance() {
    let err = NodeInstancesCommand::new()
        .get(&manager(), "nope_000")
        .unwrap_err();
    assert_eq!(err.to_string(), "Node instance nope_000 not found");
}

#[test]
fn list_filters_by_deployment_and_node() {
    let cmd = NodeInstancesCommand::new();
    let manager = manager();

    assert_eq!(cmd.list(&manager, None, None).unwrap().len(), 3);
    assert_eq!(cmd.list(&manager, Some("web"), None).unwrap().len(), 2);

    let rows = cmd.list(&manager, Some("web"), Some("vm")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, "vm_a1b2c3");

    let db = cmd.list(&manager, Some("db"), None).unwrap();
    assert_eq!(db[0].host_id, "");
    assert_eq!(db[0].state, "");
}

#[test]
fn list_unknown_deployment() {
    let err = NodeInstancesCommand::new()
        .list(&manager(), Some("ghost"), None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Deployment ghost does not exist");
}

#[test]
fn local_node_instances() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("node-instances");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("vm_1.json"),
        json!({"id": "vm_1", "node_id": "vm", "state": "started"}).to_string(),
    )
    .unwrap();

    let storage = LocalStorage::new(temp.path());
    let cmd = NodeInstancesCommand::new();

    let all = cmd.local(&storage, None).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["state"], "started");

    let err = cmd.local(&storage, Some("db")).unwrap_err();
    assert_eq!(err.to_string(), "Could not find node db");
}
