//! Command handlers for the sitepush binary

pub mod deployers;
pub mod publish;
pub mod servers;

use std::io::{self, Write};
use std::path::Path;

use anyhow::Result;
use sitepush::config::{self, ConfigWarning};
use sitepush::PublishConfig;

pub use deployers::cmd_deployers;
pub use publish::{cmd_publish, PublishArgs};
pub use servers::cmd_servers;

/// Write one NDJSON line to stdout
pub fn emit_json(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    let line = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_string());
    out.write_all(line.as_bytes())?;
    out.write_all(b"\n")
}

/// Load the publisher config, printing unknown keys to stderr
pub fn load_config(path: &Path) -> Result<PublishConfig> {
    let (config, warnings) = config::load_with_warnings(path)?;
    for warning in &warnings {
        eprintln!("{}", format_warning(warning));
    }
    Ok(config)
}

fn format_warning(warning: &ConfigWarning) -> String {
    match warning.line {
        Some(line) => format!(
            "warning: unknown config key '{}' in {}:{}",
            warning.key,
            warning.file.display(),
            line
        ),
        None => format!(
            "warning: unknown config key '{}' in {}",
            warning.key,
            warning.file.display()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn warning_includes_line_when_known() {
        let warning = ConfigWarning {
            key: "colour".to_string(),
            file: PathBuf::from("sitepush.toml"),
            line: Some(4),
        };
        assert_eq!(
            format_warning(&warning),
            "warning: unknown config key 'colour' in sitepush.toml:4"
        );
    }

    #[test]
    fn warning_without_line() {
        let warning = ConfigWarning {
            key: "colour".to_string(),
            file: PathBuf::from("sitepush.toml"),
            line: None,
        };
        assert_eq!(
            format_warning(&warning),
            "warning: unknown config key 'colour' in sitepush.toml"
        );
    }
}
