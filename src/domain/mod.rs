//! Domain Layer
//!
//! The publish model without I/O: sessions, dependencies, staging paths and
//! the ports the orchestrator talks to.
//!
//! ## Structure
//!
//! - `entities/` - Session, Dependency, RenderedPage, StagingFiles
//! - `value_objects/` - StagingPath, PublishStep
//! - `ports/` - Collaborator, deployer, extension and progress interfaces
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod entities;
pub mod ports;
pub mod value_objects;
