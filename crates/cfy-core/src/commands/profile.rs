//! `cfy use`: select the active manager.

use anyhow::Context;
use serde::Serialize;

use crate::config::{ConfigStore, ManagerConfig};

/// Options for selecting a manager
#[derive(Debug, Clone)]
pub struct UseOptions {
    pub host: String,
    /// None keeps the configured port
    pub rest_port: Option<u16>,
    /// None keeps the configured protocol
    pub rest_protocol: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl UseOptions {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            rest_port: None,
            rest_protocol: None,
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.rest_port = Some(port);
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.rest_protocol = Some(protocol.into());
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.username = Some(username.into());
        self.password = password;
        self
    }
}

/// Result of `cfy use`
#[derive(Debug, Clone, Serialize)]
pub struct UseReport {
    pub host: String,
    pub base_url: String,
    /// Whether the stored configuration changed
    pub changed: bool,
}

#[derive(Debug)]
pub struct ProfileCommand {
    store: ConfigStore,
}

impl ProfileCommand {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    /// Persist `options.host` as the active manager.
    pub fn use_manager(&self, options: &UseOptions) -> anyhow::Result<UseReport> {
        let mut config = self.store.load()?;
        let previous = config.manager.clone();

        let mut manager = ManagerConfig {
            host: Some(options.host.clone()),
            ..previous.clone()
        };
        if let Some(port) = options.rest_port {
            manager.rest_port = port;
        }
        if let Some(protocol) = &options.rest_protocol {
            manager.rest_protocol = protocol.clone();
        }
        if options.username.is_some() {
            manager.username = options.username.clone();
            manager.password = options.password.clone();
        }

        let changed = manager != previous;
        config.manager = manager;
        if changed {
            config
                .validate()
                .with_context(|| format!("Invalid manager settings for {}", options.host))?;
            self.store.save(&config)?;
            tracing::info!("Using manager {}", options.host);
        }

        let base_url = config.manager.base_url().unwrap_or_default();
        Ok(UseReport {
            host: options.host.clone(),
            base_url,
            changed,
        })
    }
}
