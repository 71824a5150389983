//! Publish Options
//!
//! Per-run options and the process-wide settings the use case is built with.

use std::path::PathBuf;

use crate::config::PublishConfig;
use crate::domain::entities::{PublishItem, SessionId};
pub use crate::domain::value_objects::CancellationToken;

/// Where staging trees live and where `~/` sources resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    pub sync_root: PathBuf,
    pub site_root: PathBuf,
}

impl PublishSettings {
    pub fn new(sync_root: impl Into<PathBuf>, site_root: impl Into<PathBuf>) -> Self {
        Self {
            sync_root: sync_root.into(),
            site_root: site_root.into(),
        }
    }

    pub fn from_config(config: &PublishConfig) -> Self {
        Self::new(config.sync_root.clone(), config.site_root.clone())
    }
}

/// Options for one publish run
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Caller supplied session id; a fresh one is generated when absent or nil
    pub session_id: Option<SessionId>,
    /// Server alias to publish to
    pub destination: String,
    pub items: Vec<PublishItem>,
    /// Run the Files step (css, scripts, generated files)
    pub include_files: bool,
    /// Delete the staging tree after a successful upload
    pub clean_staging: bool,
    pub cancel: CancellationToken,
}

impl PublishOptions {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            session_id: None,
            destination: destination.into(),
            items: Vec::new(),
            include_files: false,
            clean_staging: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_session_id(mut self, id: SessionId) -> Self {
        self.session_id = Some(id);
        self
    }

    pub fn with_items(mut self, items: Vec<PublishItem>) -> Self {
        self.items = items;
        self
    }

    pub fn with_item(mut self, item: PublishItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_files(mut self, include: bool) -> Self {
        self.include_files = include;
        self
    }

    pub fn with_clean_staging(mut self, clean: bool) -> Self {
        self.clean_staging = clean;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }
}
