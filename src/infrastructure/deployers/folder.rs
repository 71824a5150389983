//! Folder Deployer
//!
//! Copies the staging tree into a local (or mounted) directory.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::config::{expand_home, DeployerSettings};
use crate::domain::ports::{DeployError, Deployer, ProgressReporter, TransferResult};
use crate::domain::value_objects::CancellationToken;
use crate::infrastructure::fs::copy_tree;

pub const FOLDER_ALIAS: &str = "folder";

#[derive(Debug, Clone, Copy, Default)]
pub struct FolderDeployer;

impl FolderDeployer {
    pub fn new() -> Self {
        Self
    }
}

impl Deployer for FolderDeployer {
    fn name(&self) -> &'static str {
        "Folder"
    }

    fn alias(&self) -> &'static str {
        FOLDER_ALIAS
    }

    fn validate(&self, settings: &DeployerSettings) -> Result<(), DeployError> {
        if settings.folder.trim().is_empty() {
            return Err(DeployError::MissingSetting {
                deployer: FOLDER_ALIAS,
                setting: "folder",
            });
        }
        Ok(())
    }

    /// Reports a single copy operation, not a file count
    fn deploy(
        &self,
        source: &Path,
        settings: &DeployerSettings,
        reporter: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> TransferResult {
        self.validate(settings)?;
        let destination = expand_home(Path::new(settings.folder.trim()));

        fs::create_dir_all(&destination).map_err(|e| DeployError::io(&destination, e))?;
        reporter.tick(&format!("Copying to {}", destination.display()), 1, 1);

        let files = copy_tree(source, &destination, cancel).map_err(|e| {
            if e.is_cancelled() {
                DeployError::Cancelled { transferred: 0 }
            } else {
                DeployError::io(e.path, e.source)
            }
        })?;
        info!(destination = %destination.display(), files, "copied staging tree");

        Ok(1)
    }
}
