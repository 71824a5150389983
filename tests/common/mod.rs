//! Common test utilities for sitepush CLI and end-to-end tests.
//!
//! - `TestEnv`: isolated site directory with helpers to run the binary
//! - Fixtures: a small site (config, manifest, pages, media, css)

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
