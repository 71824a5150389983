//! Content Collaborator Ports
//!
//! The CMS side of a publish run: dependency resolution, page rendering and
//! media copying. The orchestrator treats these as black boxes.

use std::path::{Path, PathBuf};

use anyhow::Result;

use super::progress::ProgressReporter;
use crate::domain::entities::{Dependency, PublishItem};

/// Computes the full dependency set for the requested items
pub trait DependencyResolver {
    /// Order is preserved for progress reporting.
    fn dependencies(
        &self,
        items: &[PublishItem],
        reporter: &dyn ProgressReporter,
    ) -> Result<Vec<Dependency>>;
}

/// Renders documents to html
pub trait PageRenderer {
    /// Whether the item still resolves in the current published state
    fn is_published(&self, id: &str) -> bool;

    fn render(&self, id: &str) -> Result<String>;

    /// Url path of the item; `_errors/<id>/` when it does not resolve
    fn item_path(&self, id: &str) -> String;
}

/// Copies media backing files
pub trait MediaStore {
    /// Copy the media file under `destination_root`, returning the path it
    /// was written to relative to that root.
    fn copy_media(&self, media: &Dependency, destination_root: &Path) -> Result<PathBuf>;
}

/// Fallback path for an item that no longer resolves
pub fn unresolved_item_path(id: &str) -> String {
    format!("_errors/{}/", id)
}
