//! Workflow command implementation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::rest::{Deployment, ManagerApi, Workflow};

/// One row of the workflow table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowRow {
    pub blueprint_id: String,
    pub deployment_id: String,
    pub name: String,
    pub created_at: String,
}

impl WorkflowRow {
    fn new(deployment: &Deployment, workflow: &Workflow) -> Self {
        Self {
            blueprint_id: deployment.blueprint_id.clone().unwrap_or_default(),
            deployment_id: deployment.id.clone(),
            name: workflow.name.clone(),
            created_at: workflow.created_at.clone().unwrap_or_default(),
        }
    }
}

/// A workflow parameter as shown by `workflows get`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkflowParameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Output of `workflows get`
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDetails {
    #[serde(flatten)]
    pub row: WorkflowRow,
    /// Parameters without a default
    pub mandatory_parameters: Vec<WorkflowParameter>,
    pub optional_parameters: Vec<WorkflowParameter>,
}

#[derive(Debug, Default)]
pub struct WorkflowsCommand;

impl WorkflowsCommand {
    pub fn new() -> Self {
        Self
    }

    fn deployment(&self, api: &dyn ManagerApi, deployment_id: &str) -> anyhow::Result<Deployment> {
        match api.get_deployment(deployment_id) {
            Ok(deployment) => Ok(deployment),
            Err(e) if e.is_not_found() => anyhow::bail!("Deployment {deployment_id} not found"),
            Err(e) => Err(e.into()),
        }
    }

    /// Workflows of a deployment, sorted by name.
    pub fn list(&self, api: &dyn ManagerApi, deployment_id: &str) -> anyhow::Result<Vec<WorkflowRow>> {
        tracing::info!("Listing workflows for deployment: '{deployment_id}'...");
        let deployment = self.deployment(api, deployment_id)?;

        let mut rows: Vec<WorkflowRow> = deployment
            .workflows
            .iter()
            .map(|w| WorkflowRow::new(&deployment, w))
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    pub fn get(
        &self,
        api: &dyn ManagerApi,
        deployment_id: &str,
        workflow_id: &str,
    ) -> anyhow::Result<WorkflowDetails> {
        tracing::info!("Retrieving workflow '{workflow_id}' of deployment '{deployment_id}'");
        let deployment = self.deployment(api, deployment_id)?;
        let Some(workflow) = deployment.workflows.iter().find(|w| w.name == workflow_id) else {
            anyhow::bail!("Workflow {workflow_id} not found");
        };

        let (optional, mandatory) = split_parameters(&workflow.parameters);
        Ok(WorkflowDetails {
            row: WorkflowRow::new(&deployment, workflow),
            mandatory_parameters: mandatory,
            optional_parameters: optional,
        })
    }
}

/// Split parameters into (optional, mandatory); a parameter is optional when
/// it declares a `default`.
fn split_parameters(
    parameters: &BTreeMap<String, Value>,
) -> (Vec<WorkflowParameter>, Vec<WorkflowParameter>) {
    parameters
        .iter()
        .map(|(name, spec)| WorkflowParameter {
            name: name.clone(),
            default: spec.get("default").cloned(),
            description: spec
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .partition(|p| p.default.is_some())
}
