mod support;

use cfy_core::commands::WorkflowsCommand;
use serde_json::json;

use support::{FakeManager, deployment};

fn manager() -> FakeManager {
    FakeManager {
        deployments: vec![deployment(json!({
            "id": "web",
            "blueprint_id": "hello",
            "workflows": [
                {"name": "uninstall", "created_at": "2016-05-01"},
                {"name": "install", "created_at": "2016-05-01"},
                {
                    "name": "scale",
                    "parameters": {
                        "node_id": {"description": "Which node to scale"},
                        "delta": {"default": 1},
                        "scale_compute": {"default": true, "description": "Scale the host too"}
                    }
                }
            ]
        }))],
        ..FakeManager::new()
    }
}

#[test]
fn list_sorted_by_name_with_deployment_defaults() {
    let rows = WorkflowsCommand::new().list(&manager(), "web").unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["install", "scale", "uninstall"]);
    assert!(rows.iter().all(|r| r.blueprint_id == "hello"));
    assert!(rows.iter().all(|r| r.deployment_id == "web"));
    assert_eq!(rows[1].created_at, "");
}

#[test]
fn get_splits_parameters() {
    let details = WorkflowsCommand::new()
        .get(&manager(), "web", "scale")
        .unwrap();

    assert_eq!(details.row.name, "scale");
    assert_eq!(details.mandatory_parameters.len(), 1);
    assert_eq!(details.mandatory_parameters[0].name, "node_id");

    let optional: Vec<&str> = details
        .optional_parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(optional, ["delta", "scale_compute"]);
}

#[test]
fn get_unknown_workflow() {
    let err = WorkflowsCommand::new()
        .get(&manager(), "web", "heal")
        .unwrap_err();
    assert_eq!(err.to_string(), "Workflow heal not found");
}

#[test]
fn unknown_deployment() {
    let cmd = WorkflowsCommand::new();
    let err = cmd.get(&manager(), "ghost", "install").unwrap_err();
    assert_eq!(err.to_string(), "Deployment ghost not found");

    let err = cmd.list(&manager(), "ghost").unwrap_err();
    assert_eq!(err.to_string(), "Deployment ghost not found");
}
