//! Deployer Port
//!
//! Moves a staged directory tree to one destination kind. Deployers are
//! selected by alias through the `DeployerRegistry`.
//!
//! A deploy either returns the number of files it transferred or the error
//! that stopped it. Files transferred before a failure stay on the
//! destination; there is no rollback.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::progress::ProgressReporter;
use crate::config::DeployerSettings;
use crate::domain::value_objects::CancellationToken;

/// Outcome of a deployer run
pub type TransferResult = Result<usize, DeployError>;

/// Failure during validation or transfer
#[derive(Error, Debug)]
pub enum DeployError {
    /// A setting the deployer needs is empty or absent
    #[error("{deployer}: missing required setting '{setting}'")]
    MissingSetting {
        deployer: &'static str,
        setting: &'static str,
    },

    #[error("invalid setting '{setting}': {message}")]
    InvalidSetting {
        setting: &'static str,
        message: String,
    },

    #[error("connection to {server} failed: {message}")]
    Connection { server: String, message: String },

    #[error("authentication failed for {username}@{server}: {message}")]
    Authentication {
        server: String,
        username: String,
        message: String,
    },

    #[error("not connected to {server}")]
    NotConnected { server: String },

    #[error("remote operation on '{path}' failed: {message}")]
    Remote { path: String, message: String },

    /// The run was cancelled between two file transfers
    #[error("cancelled after {transferred} file(s)")]
    Cancelled { transferred: usize },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeployError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeployError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn remote(path: impl Into<String>, message: impl ToString) -> Self {
        DeployError::Remote {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// A transport for staged site trees
pub trait Deployer: Send + Sync {
    /// Human readable name
    fn name(&self) -> &'static str;

    /// Stable lookup key (matched case-insensitively)
    fn alias(&self) -> &'static str;

    /// Check the settings before a publish starts
    fn validate(&self, _settings: &DeployerSettings) -> Result<(), DeployError> {
        Ok(())
    }

    /// Transfer everything under `source` to the destination, stopping with
    /// `DeployError::Cancelled` once `cancel` is set
    fn deploy(
        &self,
        source: &Path,
        settings: &DeployerSettings,
        reporter: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> TransferResult;
}
