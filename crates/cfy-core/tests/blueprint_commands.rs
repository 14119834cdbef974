//! Integration tests for blueprint list/get/inputs/download/delete

mod support;

use cfy_core::commands::BlueprintsCommand;
use cfy_core::source::BlueprintResolver;
use cfy_core::validate::DslValidator;
use serde_json::json;
use tempfile::TempDir;

use support::{FakeManager, blueprint, deployment};

fn command() -> BlueprintsCommand {
    BlueprintsCommand::new(
        BlueprintResolver::new(),
        DslValidator::default(),
        "blueprint.yaml",
    )
}

fn manager() -> FakeManager {
    FakeManager {
        blueprints: vec![
            blueprint(json!({
                "id": "hello",
                "description": "Deploys a simple python web server",
                "main_file_name": "blueprint.yaml",
                "created_at": "2016-05-01 10:00:00",
                "updated_at": "2016-05-01 10:00:00",
                "plan": {
                    "inputs": {
                        "webserver_port": {"type": "integer", "default": 8000},
                        "agent_user": {"description": "User for the agent"},
                        "image": {"default": "ubuntu-14.04", "description": "Image name"}
                    }
                }
            })),
            blueprint(json!({"id": "bare"})),
        ],
        deployments: vec![
            deployment(json!({"id": "hello-1", "blueprint_id": "hello"})),
            deployment(json!({"id": "hello-2", "blueprint_id": "hello"})),
            deployment(json!({"id": "other", "blueprint_id": "bare"})),
        ],
        ..FakeManager::new()
    }
}

#[test]
fn list_trims_long_descriptions() {
    let rows = command().list(&manager()).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "hello");
    assert_eq!(rows[0].description, "Deploys a simple p..");
    assert_eq!(rows[1].description, "");
    assert_eq!(rows[1].main_file_name, "");
}

#[test]
fn get_counts_deployments() {
    let details = command().get(&manager(), "hello").unwrap();

    assert_eq!(details.deployment_count, 2);
    assert_eq!(details.deployment_ids, ["hello-1", "hello-2"]);
    assert_eq!(
        details.full_description.as_deref(),
        Some("Deploys a simple python web server")
    );

    let value = serde_json::to_value(&details).unwrap();
    assert_eq!(value["#deployments"], 2);
    assert_eq!(value["id"], "hello");
}

#[test]
fn get_unknown_blueprint_fails() {
    let err = command().get(&manager(), "missing").unwrap_err();
    assert_eq!(err.to_string(), "Blueprint missing not found");
}

#[test]
fn inputs_sorted_with_placeholders() {
    let rows = command().inputs(&manager(), "hello").unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["agent_user", "image", "webserver_port"]);

    assert_eq!(rows[0].input_type, "-");
    assert_eq!(rows[0].default, "-");
    assert_eq!(rows[0].description, "User for the agent");

    assert_eq!(rows[1].default, "ubuntu-14.04");
    assert_eq!(rows[2].input_type, "integer");
    assert_eq!(rows[2].default, "8000");
    assert_eq!(rows[2].description, "-");
}

#[test]
fn inputs_render_non_string_fields() {
    let manager = FakeManager {
        blueprints: vec![blueprint(json!({
            "id": "odd",
            "plan": {
                "inputs": {
                    "port": {"type": "integer", "default": 8080},
                    "weird": {"description": 42, "type": ["a", "b"]},
                    "nothing": null
                }
            }
        }))],
        ..FakeManager::new()
    };

    let rows = command().inputs(&manager, "odd").unwrap();

    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["nothing", "port", "weird"]);
    assert_eq!(rows[0].input_type, "-");
    assert_eq!(rows[0].description, "-");
    assert_eq!(rows[1].default, "8080");
    assert_eq!(rows[2].description, "42");
    assert_eq!(rows[2].input_type, r#"["a","b"]"#);
}

#[test]
fn inputs_of_blueprint_without_plan_is_empty() {
    assert!(command().inputs(&manager(), "bare").unwrap().is_empty());
}

#[test]
fn download_into_directory_names_archive_after_id() {
    let temp = TempDir::new().unwrap();
    let report = command()
        .download(&manager(), "hello", Some(temp.path().to_path_buf()))
        .unwrap();

    assert_eq!(report.path, temp.path().join("hello.tar.gz"));
    assert!(report.path.exists());
}

#[test]
fn download_to_explicit_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("copy.tgz");
    let report = command()
        .download(&manager(), "hello", Some(target.clone()))
        .unwrap();
    assert_eq!(report.path, target);
}

#[test]
fn delete_records_blueprint() {
    let manager = manager();
    let report = command().delete(&manager, "bare").unwrap();

    assert_eq!(report.blueprint_id, "bare");
    assert_eq!(*manager.deleted.lock().unwrap(), ["bare"]);
}
