//! Content source implementations

mod manifest;

pub use manifest::{ManifestContent, ManifestItem, MANIFEST_FILE};
