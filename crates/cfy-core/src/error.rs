//! Error types shared across cfy-core.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a blueprint reference into a local definition file.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Nothing exists at the given path, URL or shorthand, or the definition
    /// file is missing after extraction.
    #[error("Blueprint source not found: {0}")]
    SourceNotFound(String),

    #[error("Unsupported archive type: {0} (supported: zip, tar, tar.gz, tar.bz2)")]
    UnsupportedArchive(String),

    #[error("Failed to fetch {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to extract {}: {message}", path.display())]
    Extraction { path: PathBuf, message: String },
}

impl SourceError {
    pub(crate) fn not_found(what: impl Into<String>) -> Self {
        Self::SourceNotFound(what.into())
    }

    pub(crate) fn transport(url: &str, message: impl ToString) -> Self {
        Self::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn extraction(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Extraction {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Failures reported by the manager REST API collaborator.
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("Manager returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to reach manager at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Failed to decode manager response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ManagerError {
    /// True when the manager answered 404 for the requested resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failures while validating a blueprint definition.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Parse(String),

    #[error("Blueprint root must be a mapping")]
    NotAMapping,

    #[error("Missing required field: tosca_definitions_version")]
    MissingVersion,

    #[error("Unsupported tosca_definitions_version: {0}")]
    UnsupportedVersion(String),

    #[error("Section '{0}' must be a mapping")]
    InvalidSection(String),

    #[error("Node template '{0}' is missing a type")]
    MissingNodeType(String),
}
