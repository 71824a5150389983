//! Staging Path Value Object
//!
//! A destination path inside a staging tree:
//! - A leading `~/` is stripped exactly once
//! - Leading `/` and `\` are stripped (url paths are relative to the root)
//! - Backslashes are normalized to `/`
//! - No traversal (`..`) and no drive prefix (`C:`, `C:\`, `C:foo`)
//!
//! A UNC form such as `\\server\share` loses its leading separators and
//! parses as the relative path `server/share`.

use std::fmt;
use std::path::{Path, PathBuf};

/// Error when path validation fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path contains traversal components (..)
    ContainsTraversal { path: String },
    /// Path starts with a drive prefix
    AbsoluteNotAllowed { path: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::ContainsTraversal { path } => {
                write!(f, "path '{}' contains traversal components (..)", path)
            }
            PathError::AbsoluteNotAllowed { path } => {
                write!(f, "path '{}' is absolute; staging paths must be relative", path)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A validated path relative to a staging (or site) root
///
/// The empty path denotes the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StagingPath(Vec<String>);

impl StagingPath {
    /// Parse a raw destination path
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let normalized = raw.replace('\\', "/");
        let stripped = normalized.strip_prefix("~/").unwrap_or(&normalized);
        let stripped = stripped.trim_start_matches('/');

        let mut segments = Vec::new();
        for (index, segment) in stripped.split('/').enumerate() {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(PathError::ContainsTraversal {
                        path: raw.to_string(),
                    })
                }
                s if index == 0 && is_drive_prefix(s) => {
                    return Err(PathError::AbsoluteNotAllowed {
                        path: raw.to_string(),
                    })
                }
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self(segments))
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Join onto a root directory
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        for segment in &self.0 {
            path.push(segment);
        }
        path
    }

    /// Append a validated segment path
    pub fn join(&self, other: &str) -> Result<Self, PathError> {
        let tail = Self::parse(other)?;
        let mut segments = self.0.clone();
        segments.extend(tail.0);
        Ok(Self(segments))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

fn is_drive_prefix(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl fmt::Display for StagingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

impl TryFrom<&str> for StagingPath {
    type Error = PathError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}
