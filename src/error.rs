//! Error types for sitepush
//!
//! Uses `thiserror` for library errors; the binary wraps them in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::DeployError;
use crate::domain::value_objects::{PathError, PublishStep};

/// Result type alias for publish operations
pub type PublishResult<T> = Result<T, PublishError>;

/// Configuration problems. Always fatal, detected before any step runs.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("no server configured with alias '{alias}'")]
    MissingServer { alias: String },

    #[error("server '{server}' has no deployer alias")]
    MissingDeployerAlias { server: String },

    #[error("no deployer registered for alias '{alias}'")]
    UnknownDeployer { alias: String },

    #[error("server '{server}': {source}")]
    InvalidDeployerSettings {
        server: String,
        #[source]
        source: DeployError,
    },

    #[error("server store failed for '{alias}': {message}")]
    Store { alias: String, message: String },
}

/// Failure writing into the staging area
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("invalid staging path: {0}")]
    Path(#[from] PathError),

    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("media '{id}' could not be copied: {message}")]
    Media { id: String, message: String },
}

impl StagingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StagingError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Main error type for publish runs
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("dependency calculation failed: {message}")]
    Dependencies { message: String },

    #[error("{step} failed: {source}")]
    Staging {
        step: PublishStep,
        #[source]
        source: StagingError,
    },

    #[error("upload failed: {0}")]
    Transfer(#[source] DeployError),

    #[error("publish cancelled{}", after_step(.after))]
    Cancelled { after: Option<PublishStep> },
}

fn after_step(step: &Option<PublishStep>) -> String {
    match step {
        Some(step) => format!(" after step '{}'", step),
        None => String::new(),
    }
}

impl PublishError {
    /// Whether the run stopped before any step executed
    pub fn is_configuration(&self) -> bool {
        matches!(self, PublishError::Configuration(_))
    }
}
