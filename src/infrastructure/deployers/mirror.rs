//! Remote Mirror
//!
//! The tree walk shared by the FTP and SFTP deployers. A transport only
//! provides a `RemoteSession`; the walk ensures each remote directory,
//! uploads its files, then recurses into subdirectories. The cancellation
//! token is checked before every upload; files already sent stay remote.
//!
//! Remote paths always use `/`, built as `root + "/" + relative`.

use std::collections::HashMap;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use tracing::debug;
use walkdir::WalkDir;

use crate::domain::ports::{DeployError, ProgressReporter, TransferResult};
use crate::domain::value_objects::CancellationToken;

/// Size and modification time (unix seconds) of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStamp {
    pub size: u64,
    pub modified: Option<u64>,
}

impl FileStamp {
    pub fn of(path: &Path) -> Result<Self, DeployError> {
        let meta = fs::metadata(path).map_err(|e| DeployError::io(path, e))?;
        let modified = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs());
        Ok(Self {
            size: meta.len(),
            modified,
        })
    }

    /// Same size and same known mtime
    pub fn matches(&self, other: &FileStamp) -> bool {
        self.size == other.size && self.modified.is_some() && self.modified == other.modified
    }
}

/// One connected transport
pub trait RemoteSession {
    /// Make sure `path` exists on the remote side
    fn ensure_dir(&mut self, path: &str) -> Result<(), DeployError>;

    /// Files already present in `dir`, keyed by file name. `None` when the
    /// transport cannot diff and every file is uploaded.
    fn list_files(&mut self, _dir: &str) -> Result<Option<HashMap<String, FileStamp>>, DeployError> {
        Ok(None)
    }

    fn upload(&mut self, local: &Path, remote: &str, stamp: &FileStamp) -> Result<(), DeployError>;
}

/// `root + "/" + relative` with `/` separators
pub fn remote_path(root: &str, relative: &str) -> String {
    let root = root.replace('\\', "/");
    let relative = relative.replace('\\', "/");
    let relative = relative.trim_matches('/');
    if relative.is_empty() {
        return root;
    }
    if root.is_empty() {
        return relative.to_string();
    }
    format!("{}/{}", root.trim_end_matches('/'), relative)
}

/// Resolve `host` or `host:port` to a socket address
pub fn resolve_server(server: &str, default_port: u16) -> Result<(SocketAddr, String), DeployError> {
    let (host, port) = match server.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') => {
            let port = port.parse::<u16>().map_err(|_| DeployError::InvalidSetting {
                setting: "server",
                message: format!("invalid port in '{}'", server),
            })?;
            (host, port)
        }
        _ => (server, default_port),
    };

    let addr = (host, port)
        .to_socket_addrs()
        .map_err(|e| DeployError::Connection {
            server: server.to_string(),
            message: e.to_string(),
        })?
        .next()
        .ok_or_else(|| DeployError::Connection {
            server: server.to_string(),
            message: "no address found".to_string(),
        })?;

    Ok((addr, host.to_string()))
}

/// Mirror everything under `source` to `remote_root`, returning the number
/// of files uploaded.
pub fn mirror_tree(
    session: &mut dyn RemoteSession,
    source: &Path,
    remote_root: &str,
    reporter: &dyn ProgressReporter,
    cancel: &CancellationToken,
) -> TransferResult {
    let total = WalkDir::new(source)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count();

    let mut mirror = Mirror {
        session,
        reporter,
        cancel,
        total,
        visited: 0,
        uploaded: 0,
    };
    mirror.directory(source, remote_root)?;

    debug!(
        uploaded = mirror.uploaded,
        unchanged = mirror.visited - mirror.uploaded,
        "mirror complete"
    );
    Ok(mirror.uploaded)
}

struct Mirror<'a> {
    session: &'a mut dyn RemoteSession,
    reporter: &'a dyn ProgressReporter,
    cancel: &'a CancellationToken,
    total: usize,
    visited: usize,
    uploaded: usize,
}

impl Mirror<'_> {
    fn directory(&mut self, local: &Path, remote: &str) -> Result<(), DeployError> {
        self.session.ensure_dir(remote)?;
        let existing = self.session.list_files(remote)?.unwrap_or_default();
        let (files, dirs) = children(local)?;

        for (name, path) in files {
            if self.cancel.is_cancelled() {
                return Err(DeployError::Cancelled {
                    transferred: self.uploaded,
                });
            }
            self.visited += 1;
            let target = remote_path(remote, &name);
            let stamp = FileStamp::of(&path)?;

            if existing.get(&name).is_some_and(|remote| stamp.matches(remote)) {
                debug!(remote = %target, "unchanged, skipping");
                continue;
            }

            self.reporter
                .tick(&format!("Uploading {}", target), self.visited, self.total);
            self.session.upload(&path, &target, &stamp)?;
            debug!(local = %path.display(), remote = %target, "uploaded");
            self.uploaded += 1;
        }

        for (name, path) in dirs {
            self.directory(&path, &remote_path(remote, &name))?;
        }

        Ok(())
    }
}

type Children = (Vec<(String, PathBuf)>, Vec<(String, PathBuf)>);

fn children(dir: &Path) -> Result<Children, DeployError> {
    let mut files = Vec::new();
    let mut dirs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            DeployError::io(path, e.into())
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            dirs.push((name, entry.into_path()));
        } else if entry.file_type().is_file() {
            files.push((name, entry.into_path()));
        }
    }

    Ok((files, dirs))
}
