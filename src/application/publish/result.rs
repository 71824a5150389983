//! Publish Report
//!
//! Outcome of a publish run.

use crate::domain::entities::SessionId;
use crate::domain::value_objects::PublishStep;
use crate::error::PublishError;

/// Result of a publish run
#[derive(Debug)]
pub struct PublishReport {
    pub session_id: SessionId,
    pub success: bool,
    /// The failure that stopped the run
    pub error: Option<PublishError>,
    pub pages_written: usize,
    /// Unpublished, unrenderable or extension-dropped pages
    pub pages_skipped: usize,
    pub media_saved: usize,
    pub files_written: usize,
    pub files_failed: usize,
    /// Deployer count (files uploaded, or 1 for a folder copy)
    pub transferred: usize,
    pub completed_steps: Vec<PublishStep>,
}

impl PublishReport {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            success: false,
            error: None,
            pages_written: 0,
            pages_skipped: 0,
            media_saved: 0,
            files_written: 0,
            files_failed: 0,
            transferred: 0,
            completed_steps: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success && self.error.is_none()
    }

    pub fn last_completed_step(&self) -> Option<PublishStep> {
        self.completed_steps.last().copied()
    }
}
