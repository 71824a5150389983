//! Publish Session Entity
//!
//! A session is one publish run. Its id names the staging subtree
//! `<sync_root>/<session_id>` and is never reused.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use uuid::Uuid;

/// Unique identifier of a publish run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Use the caller's id, or generate one when it is absent or nil
    pub fn or_generate(id: Option<SessionId>) -> Self {
        match id {
            Some(id) if !id.is_nil() => id,
            _ => Self::new(),
        }
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// A publish run bound to its staging location
#[derive(Debug, Clone)]
pub struct PublishSession {
    id: SessionId,
    sync_root: PathBuf,
}

impl PublishSession {
    /// Start a session under `sync_root`
    pub fn start(id: Option<SessionId>, sync_root: impl Into<PathBuf>) -> Self {
        Self {
            id: SessionId::or_generate(id),
            sync_root: sync_root.into(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn sync_root(&self) -> &Path {
        &self.sync_root
    }

    /// `<sync_root>/<session_id>`
    pub fn staging_root(&self) -> PathBuf {
        self.sync_root.join(self.id.to_string())
    }
}
