//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Local copy and write helpers
//! - `deployers/` - Folder, FTP and SFTP transports plus the registry
//! - `content/` - Manifest-backed content source
//! - `config/` - TOML server config store
//! - `events/` - Console and NDJSON progress reporters
//! - `extensions/` - Built-in publish extensions

pub mod config;
pub mod content;
pub mod deployers;
pub mod events;
pub mod extensions;
pub mod fs;

// Re-export for convenience
pub use config::TomlServerStore;
pub use content::ManifestContent;
pub use deployers::{DeployerRegistry, FolderDeployer, FtpDeployer, SftpDeployer};
pub use events::{ConsoleReporter, JsonReporter};
pub use extensions::SitemapExtension;
