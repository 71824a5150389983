//! sitepush - staged site publishing
//!
//! A publish session resolves the requested content, renders pages and
//! gathers media into a per-session staging tree, then hands that tree to a
//! deployer (local folder, FTP or SFTP). Extensions can observe and reshape
//! every step.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{
    CancellationToken, ExtensionRegistry, PublishOptions, PublishReport, PublishSettings,
    PublishUseCase, StagingArea,
};
pub use config::{DeployerSettings, PublishConfig, ServerConfig};
pub use domain::entities::{Dependency, DependencyKind, PublishItem, PublishSession, SessionId};
pub use domain::ports::{
    Deployer, DependencyResolver, MediaStore, PageRenderer, ProgressReporter, PublishEvent,
    PublishExtension, ServerConfigStore,
};
pub use domain::value_objects::{PublishStep, StagingPath};
pub use error::{ConfigError, PublishError, PublishResult, StagingError};
pub use infrastructure::{DeployerRegistry, ManifestContent};
