//! Property tests for sitepush.
//!
//! Properties use randomized input generation to protect invariants like
//! "never panics" and "never escapes the staging root".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/staging_paths.rs"]
mod staging_paths;

#[path = "properties/remote_paths.rs"]
mod remote_paths;
