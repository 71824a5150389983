//! Progress Reporter Implementations
//!
//! Provides concrete implementations of ProgressReporter:
//! - JsonReporter: NDJSON output for CI/automation
//! - ConsoleReporter: Human-readable progress on stderr

mod console;
mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;
