//! Staging Area
//!
//! Materializes pages, media and auxiliary files under
//! `<sync_root>/<session_id>`. Every destination is sanitized through
//! `StagingPath` before it touches the disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::entities::{Dependency, PublishSession, RenderedPage, StagingFiles};
use crate::domain::ports::{MediaStore, ProgressReporter};
use crate::domain::value_objects::{CancellationToken, StagingPath};
use crate::error::StagingError;
use crate::infrastructure::fs::{copy_file, copy_tree, write_file, write_stream, CopyError};

const PAGE_FILE: &str = "index.html";

impl From<CopyError> for StagingError {
    fn from(e: CopyError) -> Self {
        StagingError::Io {
            path: e.path,
            source: e.source,
        }
    }
}

/// One Files-step entry that could not be staged
#[derive(Debug)]
pub struct StagingFailure {
    /// The folder, file or generated path as requested
    pub entry: String,
    pub error: StagingError,
}

/// Outcome of a best-effort `save_files`
#[derive(Debug, Default)]
pub struct StagingReport {
    /// Files written (folder contents count individually)
    pub written: usize,
    /// Folders that do not exist under the site root
    pub missing_folders: Vec<String>,
    pub failures: Vec<StagingFailure>,
    /// The token was set; the remaining entries were not attempted
    pub cancelled: bool,
}

impl StagingReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, entry: &str, error: impl Into<StagingError>) {
        let error = error.into();
        warn!(entry, error = %error, "failed to stage file");
        self.failures.push(StagingFailure {
            entry: entry.to_string(),
            error,
        });
    }

    fn copy_failed(&mut self, entry: &str, error: CopyError) {
        if error.is_cancelled() {
            self.cancelled = true;
        } else {
            self.fail(entry, error);
        }
    }
}

/// Per-entry ticks for `save_files`
struct EntryProgress<'a> {
    reporter: &'a dyn ProgressReporter,
    cancel: &'a CancellationToken,
    index: usize,
    total: usize,
}

impl EntryProgress<'_> {
    /// Tick the next entry, or `false` once the token is set
    fn next(&mut self, label: &str) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        self.index += 1;
        self.reporter.tick(label, self.index, self.total);
        true
    }
}

/// Staging manager rooted at a base directory
#[derive(Debug, Clone)]
pub struct StagingArea {
    sync_root: PathBuf,
}

impl StagingArea {
    pub fn new(sync_root: impl Into<PathBuf>) -> Self {
        Self {
            sync_root: sync_root.into(),
        }
    }

    pub fn sync_root(&self) -> &Path {
        &self.sync_root
    }

    pub fn session_root(&self, session: &PublishSession) -> PathBuf {
        self.sync_root.join(session.id().to_string())
    }

    /// Create the session subtree
    pub fn prepare(&self, session: &PublishSession) -> Result<PathBuf, StagingError> {
        let root = self.session_root(session);
        fs::create_dir_all(&root).map_err(|e| StagingError::io(&root, e))?;
        Ok(root)
    }

    /// Write `<root>/<session>/<path>/index.html`
    pub fn save_page(
        &self,
        session: &PublishSession,
        page: &RenderedPage,
    ) -> Result<PathBuf, StagingError> {
        let dir = StagingPath::parse(&page.path)?.resolve(&self.session_root(session));
        let file = dir.join(PAGE_FILE);
        write_file(&file, page.html.as_bytes())?;
        debug!(path = %file.display(), "staged page");
        Ok(file)
    }

    /// Copy a media item into the session subtree through the media store,
    /// returning the staged file path.
    pub fn save_media(
        &self,
        session: &PublishSession,
        media: &Dependency,
        store: &dyn MediaStore,
    ) -> Result<PathBuf, StagingError> {
        let root = self.prepare(session)?;
        let written = store
            .copy_media(media, &root)
            .map_err(|e| StagingError::Media {
                id: media.id.clone(),
                message: format!("{:#}", e),
            })?;

        let relative = written.strip_prefix(&root).unwrap_or(&written);
        let staged = StagingPath::parse(&relative.to_string_lossy())?.resolve(&root);
        debug!(id = %media.id, path = %staged.display(), "staged media");
        Ok(staged)
    }

    /// Stage folders, file copies and generated files. Every entry is
    /// attempted and ticked; failures are collected in the report. The
    /// token is checked before each entry and inside folder copies.
    pub fn save_files(
        &self,
        session: &PublishSession,
        site_root: &Path,
        files: StagingFiles,
        reporter: &dyn ProgressReporter,
        cancel: &CancellationToken,
    ) -> StagingReport {
        let root = self.session_root(session);
        let mut report = StagingReport::default();
        let mut progress = EntryProgress {
            reporter,
            cancel,
            index: 0,
            total: files.len(),
        };

        for folder in &files.folders {
            if !progress.next(&format!("Copying {}", folder)) {
                report.cancelled = true;
                return report;
            }
            let relative = match StagingPath::parse(folder) {
                Ok(relative) => relative,
                Err(e) => {
                    report.fail(folder, e);
                    continue;
                }
            };
            let source = relative.resolve(site_root);
            if !source.is_dir() {
                debug!(folder = %folder, source = %source.display(), "folder not found, skipping");
                report.missing_folders.push(folder.clone());
                continue;
            }
            match copy_tree(&source, &relative.resolve(&root), cancel) {
                Ok(count) => report.written += count,
                Err(e) => report.copy_failed(folder, e),
            }
            if report.cancelled {
                return report;
            }
        }

        for file in &files.files {
            if !progress.next(&format!("Copying {}", file.source)) {
                report.cancelled = true;
                return report;
            }
            let paths = StagingPath::parse(&file.source)
                .and_then(|src| Ok((src, StagingPath::parse(&file.destination)?)));
            let (source, destination) = match paths {
                Ok(paths) => paths,
                Err(e) => {
                    report.fail(&file.source, e);
                    continue;
                }
            };
            match copy_file(&source.resolve(site_root), &destination.resolve(&root)) {
                Ok(()) => report.written += 1,
                Err(e) => report.fail(&file.source, e),
            }
        }

        for mut custom in files.custom {
            if !progress.next(&format!("Writing {}", custom.path)) {
                report.cancelled = true;
                return report;
            }
            let destination = match StagingPath::parse(&custom.path) {
                Ok(destination) => destination.resolve(&root),
                Err(e) => {
                    report.fail(&custom.path, e);
                    continue;
                }
            };
            match write_stream(&destination, custom.content.as_mut()) {
                Ok(_) => {
                    debug!(path = %destination.display(), "staged generated file");
                    report.written += 1;
                }
                Err(e) => report.fail(&custom.path, e),
            }
        }

        report
    }

    /// Remove the session subtree
    pub fn discard(&self, session: &PublishSession) -> Result<(), StagingError> {
        let root = self.session_root(session);
        if root.exists() {
            fs::remove_dir_all(&root).map_err(|e| StagingError::io(&root, e))?;
            debug!(path = %root.display(), "discarded staging tree");
        }
        Ok(())
    }
}
