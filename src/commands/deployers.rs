//! Deployers command handler

use anyhow::Result;
use sitepush::DeployerRegistry;

use super::emit_json;

pub fn cmd_deployers(json: bool) -> Result<()> {
    let registry = DeployerRegistry::with_defaults();

    if json {
        let deployers: Vec<_> = registry
            .iter()
            .map(|d| serde_json::json!({ "alias": d.alias(), "name": d.name() }))
            .collect();
        emit_json(serde_json::json!({
            "event": "data",
            "command": "deployers",
            "deployers": deployers,
        }))?;
        return Ok(());
    }

    for deployer in registry.iter() {
        println!("{:<8} {}", deployer.alias(), deployer.name());
    }
    Ok(())
}
