//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::infrastructure::deployers::FOLDER_ALIAS;

use super::types::PublishConfig;

/// Overrides the staging base directory
pub const SYNC_ROOT_ENV: &str = "SITEPUSH_SYNC_ROOT";
/// Overrides the site root
pub const SITE_ROOT_ENV: &str = "SITEPUSH_SITE_ROOT";

/// Non-fatal configuration warning (e.g. an unknown key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
}

/// Load configuration and collect unknown keys as warnings
pub fn load_with_warnings(path: &Path) -> Result<(PublishConfig, Vec<ConfigWarning>), ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let (config, warnings) = parse_with_warnings(&content, path)?;
    Ok((resolve_paths(with_env_overrides(config), path), warnings))
}

/// Load configuration, ignoring warnings
pub fn load(path: &Path) -> Result<PublishConfig, ConfigError> {
    load_with_warnings(path).map(|(config, _)| config)
}

fn parse_with_warnings(
    content: &str,
    path: &Path,
) -> Result<(PublishConfig, Vec<ConfigWarning>), ConfigError> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: PublishConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::Load {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Apply environment variable overrides (SITEPUSH_* prefix)
pub fn with_env_overrides(mut config: PublishConfig) -> PublishConfig {
    if let Ok(root) = std::env::var(SYNC_ROOT_ENV) {
        if !root.trim().is_empty() {
            config.sync_root = PathBuf::from(root);
        }
    }

    if let Ok(root) = std::env::var(SITE_ROOT_ENV) {
        if !root.trim().is_empty() {
            config.site_root = PathBuf::from(root);
        }
    }

    config
}

/// Expand `~` and anchor relative roots at the config file's directory.
/// A folder deployer's `folder` is a local path and is anchored the same
/// way; FTP and SFTP folders are remote and left as written.
fn resolve_paths(mut config: PublishConfig, config_path: &Path) -> PublishConfig {
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let anchor = |path: &Path| {
        let expanded = expand_home(path);
        if expanded.is_absolute() {
            expanded
        } else {
            base.join(expanded)
        }
    };

    config.sync_root = anchor(&config.sync_root);
    config.site_root = anchor(&config.site_root);
    for server in &mut config.servers {
        let deployer = &mut server.deployer;
        if let Some(key) = deployer.private_key.take() {
            deployer.private_key = Some(expand_home(&key));
        }
        let folder = deployer.folder.trim();
        if deployer.alias.trim().eq_ignore_ascii_case(FOLDER_ALIAS) && !folder.is_empty() {
            deployer.folder = anchor(Path::new(folder)).to_string_lossy().into_owned();
        }
    }
    config
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    if let Some(stripped) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    path.to_path_buf()
}

fn find_line_number(content: &str, key: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with(key)
                && trimmed[key.len()..].trim_start().starts_with('=')
        })
        .map(|i| i + 1)
}
