//! Application context shared by commands.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::{CfyConfig, ConfigStore, ManagerConfig, default_config_dir};
use crate::local::LocalStorage;
use crate::rest::RestClient;
use crate::source::BlueprintResolver;
use crate::validate::DslValidator;

/// Directory under the config dir used when `local.storage_dir` is unset.
const DEFAULT_LOCAL_DIR: &str = "local";

/// Loaded configuration plus factories for the services commands need.
///
/// Frontends create this once per invocation and pass it to commands.
#[derive(Debug, Clone)]
pub struct AppContext {
    config_dir: PathBuf,
    config: CfyConfig,
    manager_override: Option<String>,
}

impl AppContext {
    /// Load the context from the default config directory.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_config_dir(default_config_dir()?)
    }

    /// Load the context from `config_dir/config.toml`.
    pub fn from_config_dir(config_dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config_dir = config_dir.into();
        let config = ConfigStore::from_dir(&config_dir)
            .load()
            .context("Failed to load configuration")?;
        config.validate()?;
        Ok(Self::with_config(config_dir, config))
    }

    /// Context with an already loaded configuration (for testing).
    pub fn with_config(config_dir: impl Into<PathBuf>, config: CfyConfig) -> Self {
        Self {
            config_dir: config_dir.into(),
            config,
            manager_override: None,
        }
    }

    /// Use `host` instead of the configured manager for this invocation.
    pub fn with_manager_override(mut self, host: Option<String>) -> Self {
        self.manager_override = host;
        self
    }

    pub fn config(&self) -> &CfyConfig {
        &self.config
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_store(&self) -> ConfigStore {
        ConfigStore::from_dir(&self.config_dir)
    }

    /// Effective manager settings, with the override applied.
    pub fn manager_config(&self) -> ManagerConfig {
        let mut manager = self.config.manager.clone();
        if let Some(host) = &self.manager_override {
            manager.host = Some(host.clone());
        }
        manager
    }

    /// REST client for the active manager.
    pub fn rest_client(&self) -> anyhow::Result<RestClient> {
        let manager = self.manager_config();
        let Some(base_url) = manager.base_url() else {
            anyhow::bail!(
                "No manager configured. Run 'cfy use <HOST>' or pass --manager <HOST>"
            );
        };

        let client = RestClient::new(&base_url)
            .with_context(|| format!("Failed to create REST client for {base_url}"))?;
        Ok(match manager.username {
            Some(username) => client.with_basic_auth(username, manager.password),
            None => client,
        })
    }

    pub fn resolver(&self) -> BlueprintResolver {
        BlueprintResolver::new()
    }

    pub fn validator(&self) -> DslValidator {
        DslValidator::new(self.config.blueprints.validate_definitions_version)
    }

    /// Default definition file name inside blueprint archives.
    pub fn blueprint_filename(&self) -> &str {
        &self.config.blueprints.default_filename
    }

    pub fn local_storage(&self) -> LocalStorage {
        let dir = self
            .config
            .local
            .storage_dir
            .clone()
            .unwrap_or_else(|| self.config_dir.join(DEFAULT_LOCAL_DIR));
        LocalStorage::new(dir)
    }
}
