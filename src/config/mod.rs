//! Configuration module for sitepush
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SITEPUSH_*)
//! 3. Config file (`sitepush.toml`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{
    expand_home, load, load_with_warnings, with_env_overrides, ConfigWarning, SITE_ROOT_ENV,
    SYNC_ROOT_ENV,
};
pub use types::{
    CertificatePolicy, DeployerSettings, PublishConfig, ServerConfig, SitemapConfig, TlsVersion,
    DEFAULT_COPY_FOLDERS,
};
