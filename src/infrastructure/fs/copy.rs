//! Local tree copy and file write helpers
//!
//! Shared by the staging area (folder and file copies) and the folder
//! deployer (staging tree → destination).

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::value_objects::CancellationToken;

/// A copy or write that failed, with the path it failed on
#[derive(Error, Debug)]
#[error("{}: {source}", .path.display())]
pub struct CopyError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

impl CopyError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }

    /// The walk stopped because the token was set before `path`
    pub fn cancelled(path: impl Into<PathBuf>) -> Self {
        Self::new(path, io::Error::new(io::ErrorKind::Interrupted, "cancelled"))
    }

    pub fn is_cancelled(&self) -> bool {
        self.source.kind() == io::ErrorKind::Interrupted
    }
}

/// Recursively copy `source` into `destination`, returning the number of
/// files copied. Existing files are overwritten; symlinks are skipped.
/// The token is checked before each file.
pub fn copy_tree(
    source: &Path,
    destination: &Path,
    cancel: &CancellationToken,
) -> Result<usize, CopyError> {
    fs::create_dir_all(destination).map_err(|e| CopyError::new(destination, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(source).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).to_path_buf();
            CopyError::new(path, e.into())
        })?;

        let relative = match entry.path().strip_prefix(source) {
            Ok(relative) => relative,
            Err(_) => continue,
        };
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| CopyError::new(&target, e))?;
        } else if entry.file_type().is_file() {
            if cancel.is_cancelled() {
                return Err(CopyError::cancelled(entry.path()));
            }
            ensure_parent(&target)?;
            fs::copy(entry.path(), &target).map_err(|e| CopyError::new(entry.path(), e))?;
            debug!(from = %entry.path().display(), to = %target.display(), "copied");
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy one file, creating the destination's parent directories
pub fn copy_file(source: &Path, destination: &Path) -> Result<(), CopyError> {
    ensure_parent(destination)?;
    fs::copy(source, destination).map_err(|e| CopyError::new(source, e))?;
    Ok(())
}

/// Write bytes, creating parent directories
pub fn write_file(path: &Path, content: &[u8]) -> Result<(), CopyError> {
    ensure_parent(path)?;
    fs::write(path, content).map_err(|e| CopyError::new(path, e))
}

/// Drain a stream into a file, creating parent directories
pub fn write_stream(path: &Path, content: &mut dyn Read) -> Result<u64, CopyError> {
    ensure_parent(path)?;
    let mut file = fs::File::create(path).map_err(|e| CopyError::new(path, e))?;
    io::copy(content, &mut file).map_err(|e| CopyError::new(path, e))
}

fn ensure_parent(path: &Path) -> Result<(), CopyError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| CopyError::new(parent, e))
        }
        _ => Ok(()),
    }
}
