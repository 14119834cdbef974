//! Blueprint definition validation.

use std::path::Path;

use serde_yaml_ng::{Mapping, Value};

use crate::error::ValidationError;

/// DSL versions accepted when version validation is enabled.
pub const SUPPORTED_DSL_VERSIONS: &[&str] = &[
    "cloudify_dsl_1_0",
    "cloudify_dsl_1_1",
    "cloudify_dsl_1_2",
    "cloudify_dsl_1_3",
];

/// Sections that must be mappings when present.
const MAPPING_SECTIONS: &[&str] = &[
    "inputs",
    "node_templates",
    "node_types",
    "outputs",
    "relationships",
    "plugins",
    "workflows",
];

/// Checks a blueprint definition file.
pub trait BlueprintValidator: std::fmt::Debug {
    fn validate(&self, path: &Path) -> Result<(), ValidationError>;
}

/// Structural validation of the blueprint DSL.
///
/// Imports are not resolved; only the document itself is checked.
#[derive(Debug, Clone)]
pub struct DslValidator {
    validate_version: bool,
}

impl Default for DslValidator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DslValidator {
    pub fn new(validate_version: bool) -> Self {
        Self { validate_version }
    }

    /// Validate definition text.
    pub fn validate_str(&self, content: &str) -> Result<(), ValidationError> {
        let document: Value =
            serde_yaml_ng::from_str(content).map_err(|e| ValidationError::Parse(e.to_string()))?;
        let root = document.as_mapping().ok_or(ValidationError::NotAMapping)?;

        let version = root
            .get("tosca_definitions_version")
            .and_then(Value::as_str)
            .ok_or(ValidationError::MissingVersion)?;
        if self.validate_version && !SUPPORTED_DSL_VERSIONS.contains(&version) {
            return Err(ValidationError::UnsupportedVersion(version.to_string()));
        }

        for section in MAPPING_SECTIONS {
            match root.get(*section) {
                None | Some(Value::Null) | Some(Value::Mapping(_)) => {}
                Some(_) => return Err(ValidationError::InvalidSection(section.to_string())),
            }
        }

        if let Some(Value::Mapping(templates)) = root.get("node_templates") {
            check_node_templates(templates)?;
        }

        Ok(())
    }
}

fn check_node_templates(templates: &Mapping) -> Result<(), ValidationError> {
    for (name, template) in templates {
        let name = name.as_str().unwrap_or("<non-string key>").to_string();
        let has_type = template
            .as_mapping()
            .and_then(|t| t.get("type"))
            .and_then(Value::as_str)
            .is_some_and(|t| !t.is_empty());
        if !has_type {
            return Err(ValidationError::MissingNodeType(name));
        }
    }
    Ok(())
}

impl BlueprintValidator for DslValidator {
    fn validate(&self, path: &Path) -> Result<(), ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|source| ValidationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.validate_str(&content)
    }
}
