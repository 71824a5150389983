//! Auxiliary Files Entity
//!
//! The folders, explicit file copies and generated streams staged by the
//! Files step. Extensions may add entries before they are persisted.

use std::fmt;
use std::io::{Cursor, Read};

/// An explicit source → destination copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFile {
    /// Source path, resolved under the site root
    pub source: String,
    /// Destination path, relative to the session staging root
    pub destination: String,
}

impl CopyFile {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// A generated file: destination path plus the stream producing its bytes
///
/// The stream is consumed once and dropped after it has been written.
pub struct CustomFile {
    pub path: String,
    pub content: Box<dyn Read + Send>,
}

impl CustomFile {
    pub fn new(path: impl Into<String>, content: Box<dyn Read + Send>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    pub fn from_bytes(path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(path, Box::new(Cursor::new(bytes.into())))
    }
}

impl fmt::Debug for CustomFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Everything the Files step will stage
#[derive(Debug, Default)]
pub struct StagingFiles {
    /// Folders copied recursively (a leading `~/` is stripped)
    pub folders: Vec<String>,
    pub files: Vec<CopyFile>,
    pub custom: Vec<CustomFile>,
}

impl StagingFiles {
    pub fn with_folders(folders: Vec<String>) -> Self {
        Self {
            folders,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len() + self.custom.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
