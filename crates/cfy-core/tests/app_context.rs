use tempfile::TempDir;

use cfy_core::config::{CfyConfig, ConfigStore};
use cfy_core::context::AppContext;

#[test]
fn context_loads_saved_config() {
    let temp = TempDir::new().unwrap();
    let mut config = CfyConfig::new();
    config.manager.host = Some("10.0.0.5".to_string());
    config.blueprints.default_filename = "main.yaml".to_string();
    ConfigStore::from_dir(temp.path()).save(&config).unwrap();

    let ctx = AppContext::from_config_dir(temp.path()).unwrap();

    assert_eq!(ctx.config_dir(), temp.path());
    assert_eq!(ctx.blueprint_filename(), "main.yaml");
    let client = ctx.rest_client().unwrap();
    assert_eq!(client.base_url().as_str(), "http://10.0.0.5/");
}

#[test]
fn context_rejects_invalid_config() {
    let temp = TempDir::new().unwrap();
    std::fs::write(
        temp.path().join("config.toml"),
        "[manager]\nhost = \"10.0.0.5\"\nrest_protocol = \"ftp\"\n",
    )
    .unwrap();

    assert!(AppContext::from_config_dir(temp.path()).is_err());
}

#[test]
fn configured_storage_dir_is_used() {
    let temp = TempDir::new().unwrap();
    let mut config = CfyConfig::new();
    config.local.storage_dir = Some(temp.path().join("env"));

    let ctx = AppContext::with_config(temp.path(), config);
    assert_eq!(ctx.local_storage().storage_dir(), temp.path().join("env"));
}

#[test]
fn basic_auth_client_is_built() {
    let temp = TempDir::new().unwrap();
    let mut config = CfyConfig::new();
    config.manager.host = Some("manager.local".to_string());
    config.manager.rest_protocol = "https".to_string();
    config.manager.rest_port = 8443;
    config.manager.username = Some("admin".to_string());

    let ctx = AppContext::with_config(temp.path(), config);
    let client = ctx.rest_client().unwrap();
    assert_eq!(client.base_url().as_str(), "https://manager.local:8443/");
}
