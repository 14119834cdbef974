//! Manager REST API access.
//!
//! Commands talk to the manager only through [`ManagerApi`], so they can be
//! exercised against an in-memory implementation in tests.

mod client;
pub mod models;

use std::path::{Path, PathBuf};

pub use client::RestClient;
pub use models::{
    Blueprint, BlueprintInput, Deployment, Execution, MAINTENANCE_MODE_ACTIVE, MaintenanceStatus,
    NodeInstance, Workflow,
};

use crate::error::ManagerError;

/// Operations the CLI performs against a manager.
pub trait ManagerApi {
    fn list_blueprints(&self) -> Result<Vec<Blueprint>, ManagerError>;

    fn get_blueprint(&self, id: &str) -> Result<Blueprint, ManagerError>;

    /// Upload the blueprint whose main definition file is `definition_path`.
    ///
    /// The definition's directory is uploaded as a whole.
    fn upload_blueprint(&self, definition_path: &Path, id: &str) -> Result<Blueprint, ManagerError>;

    /// Download a blueprint archive, returning the written file.
    ///
    /// When `output_path` is a directory the archive is saved as `<id>.tar.gz`
    /// inside it.
    fn download_blueprint(&self, id: &str, output_path: &Path) -> Result<PathBuf, ManagerError>;

    fn delete_blueprint(&self, id: &str) -> Result<(), ManagerError>;

    fn list_deployments(&self, blueprint_id: Option<&str>) -> Result<Vec<Deployment>, ManagerError>;

    fn get_deployment(&self, id: &str) -> Result<Deployment, ManagerError>;

    fn get_node_instance(&self, id: &str) -> Result<NodeInstance, ManagerError>;

    fn list_node_instances(
        &self,
        deployment_id: Option<&str>,
        node_name: Option<&str>,
    ) -> Result<Vec<NodeInstance>, ManagerError>;

    fn maintenance_status(&self) -> Result<MaintenanceStatus, ManagerError>;

    fn activate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError>;

    fn deactivate_maintenance(&self) -> Result<MaintenanceStatus, ManagerError>;
}
