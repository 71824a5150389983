//! Configuration type definitions

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Folders copied by the Files step when a server lists none
pub const DEFAULT_COPY_FOLDERS: [&str; 2] = ["~/css", "~/scripts"];

/// Top-level publisher configuration (`sitepush.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Base directory for session staging trees
    #[serde(default = "default_sync_root")]
    pub sync_root: PathBuf,

    /// Directory `~/` folder and file sources resolve against
    #[serde(default = "default_site_root")]
    pub site_root: PathBuf,

    #[serde(default)]
    pub servers: Vec<ServerConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sitemap: Option<SitemapConfig>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            sync_root: default_sync_root(),
            site_root: default_site_root(),
            servers: Vec::new(),
            sitemap: None,
        }
    }
}

impl PublishConfig {
    /// Find a server by alias, ignoring case
    pub fn server(&self, alias: &str) -> Option<&ServerConfig> {
        self.servers
            .iter()
            .find(|s| s.alias.eq_ignore_ascii_case(alias))
    }
}

fn default_sync_root() -> PathBuf {
    std::env::temp_dir().join("sitepush").join("pack")
}

fn default_site_root() -> PathBuf {
    PathBuf::from(".")
}

/// A publish destination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub alias: String,

    #[serde(default)]
    pub name: String,

    pub deployer: DeployerSettings,

    /// Extra folders to stage. Accepts a list or a comma separated string.
    #[serde(
        default,
        deserialize_with = "deserialize_folders",
        skip_serializing_if = "Option::is_none"
    )]
    pub folders: Option<Vec<String>>,
}

impl ServerConfig {
    pub fn new(alias: impl Into<String>, deployer: DeployerSettings) -> Self {
        Self {
            alias: alias.into(),
            name: String::new(),
            deployer,
            folders: None,
        }
    }

    pub fn with_folders(mut self, folders: Vec<String>) -> Self {
        self.folders = Some(folders);
        self
    }

    /// Folders for the Files step (defaults to `~/css` and `~/scripts`)
    pub fn copy_folders(&self) -> Vec<String> {
        match &self.folders {
            Some(folders) => folders.clone(),
            None => DEFAULT_COPY_FOLDERS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.alias
        } else {
            &self.name
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FoldersDe {
    List(Vec<String>),
    Delimited(String),
}

fn deserialize_folders<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let folders = match Option::<FoldersDe>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(FoldersDe::List(list)) => list,
        Some(FoldersDe::Delimited(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    };
    Ok(Some(folders))
}

/// Minimum TLS version negotiated by the FTP deployer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TlsVersion {
    #[serde(rename = "1.0")]
    Tls10,
    #[serde(rename = "1.1")]
    Tls11,
    #[default]
    #[serde(rename = "1.2")]
    Tls12,
}

/// How the FTP deployer treats server certificates
///
/// `AcceptAny` keeps compatibility with self-signed hosting setups but
/// performs no validation at all. Production destinations should use
/// `Verify`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CertificatePolicy {
    #[default]
    AcceptAny,
    Verify,
}

/// Transport settings for a server
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DeployerSettings {
    /// Deployer alias (`folder`, `ftp`, `sftp`)
    #[serde(default)]
    pub alias: String,

    /// `host` or `host:port`
    #[serde(default)]
    pub server: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    /// Destination root (local folder or remote directory)
    #[serde(default)]
    pub folder: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    #[serde(default)]
    pub min_tls: TlsVersion,

    #[serde(default)]
    pub certificate_policy: CertificatePolicy,

    /// Connect/read timeout for remote transports
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl DeployerSettings {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            timeout_secs: default_timeout_secs(),
            ..Self::default()
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_private_key(mut self, key: impl Into<PathBuf>) -> Self {
        self.private_key = Some(key.into());
        self
    }
}

impl fmt::Debug for DeployerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeployerSettings")
            .field("alias", &self.alias)
            .field("server", &self.server)
            .field("username", &self.username)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("folder", &self.folder)
            .field("private_key", &self.private_key)
            .field("min_tls", &self.min_tls)
            .field("certificate_policy", &self.certificate_policy)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

/// Sitemap extension settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SitemapConfig {
    pub base_url: String,

    #[serde(default = "default_sitemap_file")]
    pub file: String,
}

fn default_sitemap_file() -> String {
    "sitemap.xml".to_string()
}
