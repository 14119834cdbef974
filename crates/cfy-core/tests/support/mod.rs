//! Shared helpers for cfy-core integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cfy_core::error::ManagerError;
use cfy_core::rest::{Blueprint, Deployment, MaintenanceStatus, ManagerApi, NodeInstance};

pub const DEFINITION: &str = r#"tosca_definitions_version: cloudify_dsl_1_3

node_templates:
  vm:
    type: cloudify.nodes.Compute
"#;

pub const INVALID_DEFINITION: &str = "node_templates:\n  vm:\n    type: cloudify.nodes.Compute\n";

pub fn write_tar_gz(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create archive");
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    append_files(tar::Builder::new(encoder), files)
        .finish()
        .expect("Failed to finish gzip");
}

pub fn write_tar_bz2(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create archive");
    let encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
    append_files(tar::Builder::new(encoder), files)
        .finish()
        .expect("Failed to finish bzip2");
}

pub fn write_tar(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create archive");
    append_files(tar::Builder::new(file), files);
}

fn append_files<W: Write>(mut builder: tar::Builder<W>, files: &[(&str, &str)]) -> W {
    for (name, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, content.as_bytes())
            .expect("Failed to append");
    }
    builder.into_inner().expect("Failed to finish tar")
}

pub fn write_zip(path: &Path, files: &[(&str, &str)]) {
    let file = std::fs::File::create(path).expect("Failed to create zip");
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in files {
        zip.start_file(*name, options).expect("Failed to start file");
        zip.write_all(content.as_bytes()).expect("Failed to write");
    }
    zip.finish().expect("Failed to finish zip");
}

/// Entries directly under `dir`.
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|rd| rd.filter_map(|e| e.ok().map(|e| e.path())).collect())
        .unwrap_or_default()
}

/// What the fake manager saw during an upload.
#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub id: String,
    pub definition: PathBuf,
    pub content: String,
}

/// In-memory manager.
#[derive(Default)]
pub struct FakeManager {
    pub blueprints: Vec<Blueprint>,
    pub deployments: Vec<Deployment>,
    pub node_instances: Vec<NodeInstance>,
    pub fail_uploads: bool,
    pub uploads: Mutex<Vec<RecordedUpload>>,
    pub deleted: Mutex<Vec<String>>,
    /// Returned by successive status calls; the last one repeats
    pub maintenance: Mutex<VecDeque<MaintenanceStatus>>,
    pub maintenance_calls: Mutex<Vec<&'static str>>,
}

impl FakeManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_maintenance_sequence(self, statuses: &[&str]) -> Self {
        *self.maintenance.lock().unwrap() = statuses.iter().map(|s| maintenance(s)).collect();
        self
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    fn next_maintenance(&self) -> MaintenanceStatus {
        let mut queue = self.maintenance.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| maintenance("deactivated"))
        }
    }
}

pub fn maintenance(status: &str) -> MaintenanceStatus {
    serde_json::from_value(serde_json::json!({ "status": status })).unwrap()
}

pub fn blueprint(value: serde_json::Value) -> Blueprint {
    serde_json::from_value(value).unwrap()
}

pub fn deployment(value: serde_json::Value) -> Deployment {
    serde_json::from_value(value).unwrap()
}

pub fn node_instance(value: serde_json::Value) -> NodeInstance {
    serde_json::from_value(value).unwrap()
}

impl ManagerApi for FakeManager {
    fn list_blueprints(&self) -> Result<Vec<Blueprint>, ManagerError> {
        Ok(self.blueprints.clone())
    }

    fn get_blueprint(&self, id: &str) -> Result<Blueprint, ManagerError> {
        self.blueprints
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound {
                resource: "Blueprint",
                id: id.to_string(),
            })
    }

    fn upload_blueprint(&self, definition_path: &Path, id: &str) -> Result<Blueprint, ManagerError> {
        let content = std::fs::read_to_string(definition_path)?;
        self.uploads.lock().unwrap().push(RecordedUpload {
            id: id.to_string(),
            definition: definition_path.to_path_buf(),
            content,
        });
        if self.fail_uploads {
            return Err(ManagerError::Http {
                status: 500,
                message: "internal error".to_string(),
            });
        }
        Ok(blueprint(serde_json::json!({ "id": id })))
    }

    fn download_blueprint(&self, id: &str, output_path: &Path) -> Result<PathBuf, ManagerError> {
        self.get_blueprint(id)?;
        let target = if output_path.is_dir() {
            output_path.join(format!("{id}.tar.gz"))
        } else {
            output_path.to_path_buf()
        };
        std::fs::write(&target, b"archive")?;
        Ok(target)
    }

    fn delete_blueprint(&self, id: &str) -> Result<(), ManagerError> {
        self.get_blueprint(id)?;
        self.deleted.lock().unwrap().push(id.to_string());
        Ok(())
    }

    fn list_deployments(&self, blueprint_id: Option<&str>) -> Result<Vec<Deployment>, ManagerError> {
        Ok(self
            .deployments
            .iter()
            .filter(|d| blueprint_id.is_none() || d.blueprint_id.as_deref() == blueprint_id)
            .cloned()
            .collect())
    }

    fn get_deployment(&self, id: &str) -> Result<Deployment, ManagerError> {
        self.deployments
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound {
                resource: "Deployment",
                id: id.to_string(),
            })
    }

    fn get_node_instance(&self, id: &str) -> Result<NodeInstance, ManagerError> {
        self.node_instances
            .iter()
            .find(|n| n.id == id)
            .cloned()
            .ok_or_else(|| ManagerError::NotFound {
                resource: "Node instance",
                id: id.to_string(),
            })
    }

    fn list_node_instances(
        &self,
        deployment_id: Option<&str>,
        node_name: Option<&str>,
    ) -> Result<Vec<NodeInstance>, ManagerError> {
        if let Some(deployment_id) = deployment_id {
            self.get_deployment(deployment_id)?;
        }
        Ok(self
            .node_instances
            .iter()
            .filter(|n| deployment_id.is_none() || n.deployment_id.as_deref() == deployment_id)
            .filter(|n| node_name.is_none_or(|name| n.node_id == name))
            .cloned()
            .collect())
    }

    fn maintenance_status(&self) -> Result<MaintenanceStatus, ManagerError> {
        self.maintenance_calls.lock().unwrap().push("status");
        Ok(self.next_maintenance())
    }

    fn activate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError> {
        self.maintenance_calls.lock().unwrap().push("activate");
        Ok(maintenance("activating"))
    }

    fn deactivate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError> {
        self.maintenance_calls.lock().unwrap().push("deactivate");
        Ok(maintenance("deactivated"))
    }
}
