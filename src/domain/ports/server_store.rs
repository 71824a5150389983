//! Server Config Store Port
//!
//! Destination records keyed by server alias.

use anyhow::Result;

use crate::config::ServerConfig;

pub trait ServerConfigStore {
    /// Look up a destination by alias (case-insensitive). `Ok(None)` when no
    /// record exists.
    fn server(&self, alias: &str) -> Result<Option<ServerConfig>>;
}
