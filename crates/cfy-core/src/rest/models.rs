//! Resources returned by the manager REST API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paginated list envelope (`{"items": [...]}`).
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_file_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Parsed plan; only `inputs` is consumed here
    #[serde(default)]
    pub plan: Value,
}

/// A blueprint input as declared in the plan.
///
/// Fields are kept as raw values; plans are not guaranteed to use strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintInput {
    #[serde(default, rename = "type")]
    pub input_type: Option<Value>,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
}

impl Blueprint {
    /// Inputs declared in `plan.inputs`, keyed by name.
    ///
    /// Each input is read on its own; one that is not an object is listed
    /// with every field missing.
    pub fn inputs(&self) -> BTreeMap<String, BlueprintInput> {
        let Some(Value::Object(inputs)) = self.plan.get("inputs") else {
            return BTreeMap::new();
        };
        inputs
            .iter()
            .map(|(name, declaration)| {
                let input = serde_json::from_value(declaration.clone()).unwrap_or_else(|e| {
                    tracing::debug!(input = %name, "unreadable input declaration: {e}");
                    BlueprintInput::default()
                });
                (name.clone(), input)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: String,
    #[serde(default)]
    pub blueprint_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
    pub id: String,
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub host_id: Option<String>,
    pub node_id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub runtime_properties: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    #[serde(default)]
    pub deployment_id: Option<String>,
    #[serde(default)]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Maintenance mode state value once fully active.
pub const MAINTENANCE_MODE_ACTIVE: &str = "activated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceStatus {
    pub status: String,
    #[serde(default)]
    pub activated_at: Option<String>,
    #[serde(default)]
    pub activation_requested_at: Option<String>,
    #[serde(default)]
    pub requested_by: Option<String>,
    #[serde(default)]
    pub remaining_executions: Vec<Execution>,
}

impl MaintenanceStatus {
    pub fn is_active(&self) -> bool {
        self.status == MAINTENANCE_MODE_ACTIVE
    }
}
