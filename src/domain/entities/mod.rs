//! Domain Entities
//!
//! - `PublishSession` - One publish run and its staging subtree
//! - `Dependency` - A content or media item required by a run
//! - `RenderedPage` - Page html with its destination path
//! - `StagingFiles` - Extra folders, files and generated streams to stage

mod dependency;
mod page;
mod session;
mod staging_files;

pub use dependency::{Dependency, DependencyKind, PublishItem};
pub use page::RenderedPage;
pub use session::{PublishSession, SessionId};
pub use staging_files::{CopyFile, CustomFile, StagingFiles};
