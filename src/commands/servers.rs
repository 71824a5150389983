//! Servers command handler

use std::path::Path;

use anyhow::Result;
use sitepush::ServerConfig;

use super::{emit_json, load_config};

pub fn cmd_servers(config_path: &Path, json: bool) -> Result<()> {
    let config = load_config(config_path)?;

    if json {
        let servers: Vec<_> = config.servers.iter().map(server_json).collect();
        emit_json(serde_json::json!({
            "event": "data",
            "command": "servers",
            "servers": servers,
        }))?;
        return Ok(());
    }

    if config.servers.is_empty() {
        println!("No servers configured in {}", config_path.display());
        return Ok(());
    }

    for server in &config.servers {
        println!("{}", server_line(server));
    }
    Ok(())
}

fn server_line(server: &ServerConfig) -> String {
    let target = if server.deployer.server.is_empty() {
        server.deployer.folder.clone()
    } else {
        format!("{}:{}", server.deployer.server, server.deployer.folder)
    };
    format!(
        "{:<16} {:<8} {}  ({})",
        server.alias,
        server.deployer.alias,
        target,
        server.display_name()
    )
}

// Credentials are never written out
fn server_json(server: &ServerConfig) -> serde_json::Value {
    serde_json::json!({
        "alias": server.alias,
        "name": server.display_name(),
        "deployer": server.deployer.alias,
        "server": server.deployer.server,
        "folder": server.deployer.folder,
        "folders": server.copy_folders(),
    })
}
