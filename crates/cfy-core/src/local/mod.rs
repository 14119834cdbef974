//! Read access to a local execution environment's storage.
//!
//! Node instances are stored one JSON document per file under
//! `<storage_dir>/node-instances/`.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;

const NODE_INSTANCES_DIR: &str = "node-instances";

#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage_dir: storage_dir.into(),
        }
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    /// All stored node instances, ordered by instance id.
    pub fn node_instances(&self) -> anyhow::Result<Vec<Value>> {
        let dir = self.storage_dir.join(NODE_INSTANCES_DIR);
        if !dir.is_dir() {
            anyhow::bail!(
                "Local environment not initialized: {} does not exist",
                dir.display()
            );
        }

        let mut instances = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("Failed to read {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let instance: Value = serde_json::from_str(&content)
                .with_context(|| format!("Invalid node instance file {}", path.display()))?;
            instances.push(instance);
        }

        instances.sort_by(|a, b| instance_id(a).cmp(instance_id(b)));
        tracing::debug!(count = instances.len(), "loaded local node instances");
        Ok(instances)
    }

    /// Node instances, optionally restricted to one node.
    ///
    /// Filtering by a node with no instances is an error.
    pub fn node_instances_for(&self, node_id: Option<&str>) -> anyhow::Result<Vec<Value>> {
        let instances = self.node_instances()?;
        let Some(node_id) = node_id else {
            return Ok(instances);
        };

        let matching: Vec<Value> = instances
            .into_iter()
            .filter(|i| i.get("node_id").and_then(Value::as_str) == Some(node_id))
            .collect();
        if matching.is_empty() {
            anyhow::bail!("Could not find node {node_id}");
        }
        Ok(matching)
    }
}

fn instance_id(instance: &Value) -> &str {
    instance.get("id").and_then(Value::as_str).unwrap_or_default()
}
