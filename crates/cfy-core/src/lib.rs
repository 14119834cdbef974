//! cfy Core Library
//!
//! Domain logic for the orchestration manager CLI: blueprint source
//! resolution, archive handling, definition validation, the manager REST
//! client, and the commands built on top of them.

pub mod archive;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ids;
pub mod local;
pub mod rest;
pub mod source;
pub mod validate;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{CfyConfig, ConfigStore, ManagerConfig};
    pub use crate::context::AppContext;

    // Errors
    pub use crate::error::{ManagerError, SourceError, ValidationError};

    // Blueprint sources
    pub use crate::archive::ArchiveKind;
    pub use crate::source::{BlueprintResolver, BlueprintSource, ResolvedBlueprint, TempDirGuard};

    // Manager
    pub use crate::rest::{ManagerApi, RestClient};

    // Validation
    pub use crate::validate::{BlueprintValidator, DslValidator};
}
