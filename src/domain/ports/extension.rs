//! Publish Extension Port
//!
//! Extensions observe and transform a publish run at fixed lifecycle points.
//! Each extension owns a typed per-session state created by `initialize`
//! and handed back to every later hook of the same session. When
//! `initialize` fails the hooks still run, with `None` as state.
//!
//! Every hook except `initialize` has a no-op default, so an extension only
//! implements what it needs.

use std::path::Path;

use anyhow::Result;

use crate::config::ServerConfig;
use crate::domain::entities::{Dependency, PublishItem, PublishSession, RenderedPage, StagingFiles};
use crate::domain::value_objects::PublishStep;

/// What an extension was started with
#[derive(Debug, Clone, Copy)]
pub struct ExtensionContext<'a> {
    pub session: &'a PublishSession,
    /// Destination alias the run targets
    pub destination: &'a str,
    pub items: &'a [PublishItem],
    pub include_files: bool,
    pub server: &'a ServerConfig,
}

impl ExtensionContext<'_> {
    /// Base directory holding all session subtrees
    pub fn sync_root(&self) -> &Path {
        self.session.sync_root()
    }
}

/// Result of an html transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTransform {
    /// Keep the page as the previous extension left it
    Unchanged,
    /// Replace path and/or html
    Rewrite(RenderedPage),
    /// Do not stage this page
    Skip,
}

pub trait PublishExtension: Send + Sync + 'static {
    /// Per-session state
    type State: Send + 'static;

    /// Name used in logs
    fn name(&self) -> &str;

    fn initialize(&self, ctx: &ExtensionContext<'_>) -> Result<Self::State>;

    /// Add, remove or reorder dependencies in place
    fn transform_dependencies(
        &self,
        _state: Option<&mut Self::State>,
        _dependencies: &mut Vec<Dependency>,
    ) -> Result<()> {
        Ok(())
    }

    fn transform_html(
        &self,
        _state: Option<&mut Self::State>,
        _content: &Dependency,
        _page: &RenderedPage,
    ) -> Result<PageTransform> {
        Ok(PageTransform::Unchanged)
    }

    /// Post-process a media file already copied to `staged_path`
    fn transform_media(
        &self,
        _state: Option<&mut Self::State>,
        _media: &Dependency,
        _staged_path: &Path,
    ) -> Result<()> {
        Ok(())
    }

    /// Add or change the folders, files and generated streams to stage
    fn transform_custom_files(
        &self,
        _state: Option<&mut Self::State>,
        _files: &mut StagingFiles,
    ) -> Result<()> {
        Ok(())
    }

    fn step_completed(&self, _state: Option<&mut Self::State>, _step: PublishStep) -> Result<()> {
        Ok(())
    }

    fn push_complete(&self, _state: Option<&mut Self::State>) -> Result<()> {
        Ok(())
    }
}
