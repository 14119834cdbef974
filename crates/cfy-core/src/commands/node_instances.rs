//! Node-instance command implementation.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::ManagerError;
use crate::local::LocalStorage;
use crate::rest::{ManagerApi, NodeInstance};

/// One row of the node-instance table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeInstanceRow {
    pub id: String,
    pub deployment_id: String,
    pub host_id: String,
    pub node_id: String,
    pub state: String,
}

impl From<&NodeInstance> for NodeInstanceRow {
    fn from(instance: &NodeInstance) -> Self {
        Self {
            id: instance.id.clone(),
            deployment_id: instance.deployment_id.clone().unwrap_or_default(),
            host_id: instance.host_id.clone().unwrap_or_default(),
            node_id: instance.node_id.clone(),
            state: instance.state.clone().unwrap_or_default(),
        }
    }
}

/// Output of `node-instances get`
#[derive(Debug, Clone, Serialize)]
pub struct NodeInstanceDetails {
    #[serde(flatten)]
    pub row: NodeInstanceRow,
    pub runtime_properties: BTreeMap<String, Value>,
}

/// Node-instance queries against a manager or local storage
#[derive(Debug, Default)]
pub struct NodeInstancesCommand;

impl NodeInstancesCommand {
    pub fn new() -> Self {
        Self
    }

    pub fn get(&self, api: &dyn ManagerApi, id: &str) -> anyhow::Result<NodeInstanceDetails> {
        tracing::info!("Retrieving node instance {id}");
        let instance = match api.get_node_instance(id) {
            Ok(instance) => instance,
            Err(e) if e.is_not_found() => anyhow::bail!("Node instance {id} not found"),
            Err(e) => return Err(e.into()),
        };

        Ok(NodeInstanceDetails {
            row: NodeInstanceRow::from(&instance),
            runtime_properties: instance.runtime_properties,
        })
    }

    /// List instances, optionally of one deployment and node.
    pub fn list(
        &self,
        api: &dyn ManagerApi,
        deployment_id: Option<&str>,
        node_name: Option<&str>,
    ) -> anyhow::Result<Vec<NodeInstanceRow>> {
        match deployment_id {
            Some(deployment_id) => {
                tracing::info!("Listing instances for deployment {deployment_id}...")
            }
            None => tracing::info!("Listing all instances..."),
        }

        let instances = api
            .list_node_instances(deployment_id, node_name)
            .map_err(|e| match (e, deployment_id) {
                (ManagerError::NotFound { .. }, Some(deployment_id)) => {
                    anyhow::anyhow!("Deployment {deployment_id} does not exist")
                }
                (e, _) => e.into(),
            })?;

        Ok(instances.iter().map(NodeInstanceRow::from).collect())
    }

    /// Node instances of the local environment.
    pub fn local(
        &self,
        storage: &LocalStorage,
        node_id: Option<&str>,
    ) -> anyhow::Result<Vec<Value>> {
        storage.node_instances_for(node_id)
    }
}
