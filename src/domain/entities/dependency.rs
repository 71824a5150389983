//! Dependency Entity
//!
//! A resolved reference to a content or media item needed by a publish run.

use serde::{Deserialize, Serialize};

/// What kind of item a dependency points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// A page rendered to html
    Document,
    /// A file copied as-is
    Media,
    #[default]
    Other,
}

/// A content or media item required by a publish run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Stable external identifier
    pub id: String,
    pub kind: DependencyKind,
    /// Display name used in progress messages
    pub name: String,
}

impl Dependency {
    pub fn new(id: impl Into<String>, kind: DependencyKind, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            name: name.into(),
        }
    }

    pub fn document(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, DependencyKind::Document, name)
    }

    pub fn media(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, DependencyKind::Media, name)
    }

    pub fn is_document(&self) -> bool {
        self.kind == DependencyKind::Document
    }

    pub fn is_media(&self) -> bool {
        self.kind == DependencyKind::Media
    }
}

/// An item the user asked to publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishItem {
    pub id: String,
    /// Also publish everything below this item
    pub include_descendants: bool,
}

impl PublishItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            include_descendants: false,
        }
    }

    pub fn with_descendants(mut self, include: bool) -> Self {
        self.include_descendants = include;
        self
    }
}
