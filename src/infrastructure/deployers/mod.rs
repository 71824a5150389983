//! Deployer Implementations
//!
//! - `FolderDeployer` (`folder`): local or mounted directory
//! - `FtpDeployer` (`ftp`): explicit FTPS
//! - `SftpDeployer` (`sftp`): SSH file transfer
//!
//! `DeployerRegistry` is the explicit lookup table the publish use case
//! resolves server deployer aliases against.

mod folder;
mod ftp;
mod mirror;
mod sftp;

pub use folder::{FolderDeployer, FOLDER_ALIAS};
pub use ftp::{FtpDeployer, FTP_ALIAS};
pub use mirror::{mirror_tree, remote_path, FileStamp, RemoteSession};
pub use sftp::{SftpDeployer, SFTP_ALIAS};

use crate::domain::ports::Deployer;

/// Deployers keyed by alias (case-insensitive)
#[derive(Default)]
pub struct DeployerRegistry {
    deployers: Vec<Box<dyn Deployer>>,
}

impl DeployerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Folder, FTP and SFTP
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(FolderDeployer)
            .register(FtpDeployer)
            .register(SftpDeployer);
        registry
    }

    /// Add a deployer, replacing any registered under the same alias
    pub fn register<D: Deployer + 'static>(&mut self, deployer: D) -> &mut Self {
        self.deployers
            .retain(|d| !d.alias().eq_ignore_ascii_case(deployer.alias()));
        self.deployers.push(Box::new(deployer));
        self
    }

    pub fn get(&self, alias: &str) -> Option<&dyn Deployer> {
        self.deployers
            .iter()
            .find(|d| d.alias().eq_ignore_ascii_case(alias.trim()))
            .map(|d| d.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Deployer> {
        self.deployers.iter().map(|d| d.as_ref())
    }

    pub fn len(&self) -> usize {
        self.deployers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deployers.is_empty()
    }
}
