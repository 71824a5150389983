//! TOML-based server config store.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::{self, PublishConfig, ServerConfig};
use crate::domain::ports::ServerConfigStore;

/// Reads server records from a `sitepush.toml` on every lookup, so each
/// publish sees the file as it is when the run starts.
#[derive(Debug, Clone)]
pub struct TomlServerStore {
    path: PathBuf,
}

impl TomlServerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ServerConfigStore for TomlServerStore {
    fn server(&self, alias: &str) -> Result<Option<ServerConfig>> {
        let config = config::load(&self.path)?;
        Ok(config.server(alias).cloned())
    }
}

impl ServerConfigStore for PublishConfig {
    fn server(&self, alias: &str) -> Result<Option<ServerConfig>> {
        Ok(PublishConfig::server(self, alias).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn reads_server_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sitepush.toml");
        fs::write(
            &path,
            r#"
[[servers]]
alias = "Live"

[servers.deployer]
alias = "folder"
folder = "/srv/www"
"#,
        )
        .unwrap();

        let store = TomlServerStore::new(&path);
        let server = store.server("live").unwrap().unwrap();

        assert_eq!(server.alias, "Live");
        assert_eq!(server.deployer.folder, "/srv/www");
        assert!(store.server("staging").unwrap().is_none());
    }

    #[test]
    fn missing_file_is_error() {
        let dir = tempdir().unwrap();
        let store = TomlServerStore::new(dir.path().join("missing.toml"));
        assert!(store.server("live").is_err());
    }

    #[test]
    fn in_memory_config_is_a_store() {
        let config = PublishConfig {
            servers: vec![ServerConfig::new(
                "local",
                crate::config::DeployerSettings::new("folder"),
            )],
            ..PublishConfig::default()
        };

        let found = ServerConfigStore::server(&config, "LOCAL").unwrap();
        assert!(found.is_some());
    }
}
