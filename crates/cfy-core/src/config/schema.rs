//! Configuration schema for config.toml
//!
//! ```toml
//! [manager]
//! host = "10.0.0.5"
//! rest_port = 80
//! rest_protocol = "http"
//!
//! [blueprints]
//! default_filename = "blueprint.yaml"
//! validate_definitions_version = true
//!
//! [local]
//! storage_dir = "/home/me/.cfy/local"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CfyConfig {
    /// Active manager connection settings
    #[serde(default)]
    pub manager: ManagerConfig,

    /// Blueprint command defaults
    #[serde(default)]
    pub blueprints: BlueprintsConfig,

    /// Local execution environment
    #[serde(default)]
    pub local: LocalConfig,
}

impl CfyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration values that serde cannot check.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !matches!(self.manager.rest_protocol.as_str(), "http" | "https") {
            anyhow::bail!(
                "Invalid manager.rest_protocol '{}'. Use 'http' or 'https'",
                self.manager.rest_protocol
            );
        }
        if self.manager.rest_port == 0 {
            anyhow::bail!("Invalid manager.rest_port: 0");
        }
        if self.blueprints.default_filename.trim().is_empty() {
            anyhow::bail!("blueprints.default_filename must not be empty");
        }
        if self.manager.password.is_some() && self.manager.username.is_none() {
            anyhow::bail!("manager.password is set without manager.username");
        }
        Ok(())
    }
}

/// Manager connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Manager host or IP; `None` means no manager is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default = "default_rest_port")]
    pub rest_port: u16,

    /// `http` or `https`
    #[serde(default = "default_rest_protocol")]
    pub rest_protocol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            host: None,
            rest_port: default_rest_port(),
            rest_protocol: default_rest_protocol(),
            username: None,
            password: None,
        }
    }
}

impl ManagerConfig {
    /// Base URL of the REST API, if a manager is configured.
    pub fn base_url(&self) -> Option<String> {
        self.host
            .as_ref()
            .map(|host| format!("{}://{}:{}", self.rest_protocol, host, self.rest_port))
    }
}

fn default_rest_port() -> u16 {
    80
}

fn default_rest_protocol() -> String {
    "http".to_string()
}

/// Blueprint command defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlueprintsConfig {
    /// Definition file looked up inside blueprint archives
    #[serde(default = "default_blueprint_filename")]
    pub default_filename: String,

    /// Reject unknown tosca_definitions_version values during validation
    #[serde(default = "default_true")]
    pub validate_definitions_version: bool,
}

impl Default for BlueprintsConfig {
    fn default() -> Self {
        Self {
            default_filename: default_blueprint_filename(),
            validate_definitions_version: true,
        }
    }
}

pub fn default_blueprint_filename() -> String {
    "blueprint.yaml".to_string()
}

fn default_true() -> bool {
    true
}

/// Local execution environment settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// Storage directory of the local environment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}
