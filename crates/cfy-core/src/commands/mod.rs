//! High-level commands for cfy operations.
//!
//! Each command returns a serializable report; frontends decide how to render
//! it. Commands that talk to a manager take it as a `&dyn ManagerApi`.

pub mod blueprints;
pub mod maintenance;
pub mod node_instances;
pub mod profile;
pub mod workflows;

pub use blueprints::{
    BlueprintDetails, BlueprintRow, BlueprintsCommand, DeleteReport, DownloadReport, InputRow,
    UploadOptions, UploadReport, ValidateOptions, ValidateReport,
};
pub use maintenance::{
    ActivateOptions, DEFAULT_POLL_INTERVAL, ExecutionRow, MaintenanceCommand, MaintenanceReport,
};
pub use node_instances::{NodeInstanceDetails, NodeInstanceRow, NodeInstancesCommand};
pub use profile::{ProfileCommand, UseOptions, UseReport};
pub use workflows::{WorkflowDetails, WorkflowParameter, WorkflowRow, WorkflowsCommand};
