//! Application Layer
//!
//! Use cases that orchestrate the publish flow.
//! This layer:
//! - Depends on Domain layer (entities, ports)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `PublishUseCase` - Runs a publish session (calculate, pages, media, files, upload)
//!
//! ## Services
//!
//! - `ExtensionRegistry` / `ExtensionChain` - Per-session extension hooks
//! - `StagingArea` - Session staging trees

pub mod extensions;
pub mod publish;
pub mod staging;

pub use extensions::{ExtensionChain, ExtensionRegistry};
pub use publish::{CancellationToken, PublishOptions, PublishReport, PublishSettings, PublishUseCase};
pub use staging::{StagingArea, StagingFailure, StagingReport};
