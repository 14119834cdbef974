//! Configuration management
//!
//! A single `config.toml` under the user's config directory holds the active
//! manager, blueprint defaults, and the local environment location.

pub mod parser;
pub mod schema;
pub mod store;

pub use parser::{parse_config_str, parse_config_toml, to_toml};
pub use schema::{BlueprintsConfig, CfyConfig, LocalConfig, ManagerConfig};
pub use store::{CONFIG_FILE_NAME, ConfigStore, default_config_dir};
