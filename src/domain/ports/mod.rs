//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod content;
pub mod deployer;
pub mod extension;
pub mod progress;
pub mod server_store;

pub use content::{unresolved_item_path, DependencyResolver, MediaStore, PageRenderer};
pub use deployer::{DeployError, Deployer, TransferResult};
pub use extension::{ExtensionContext, PageTransform, PublishExtension};
pub use progress::{NoopReporter, ProgressReporter, PublishEvent};
pub use server_store::ServerConfigStore;
