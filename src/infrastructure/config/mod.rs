//! Server config store implementations

mod toml_store;

pub use toml_store::TomlServerStore;
