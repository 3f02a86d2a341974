//! `harness validate` - check the configuration file

use anyhow::{Context, Result};
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    let config = harness_config::parse_file(config_path)
        .with_context(|| format!("invalid configuration: {}", config_path.display()))?;

    println!("Configuration OK");
    println!("  management node: {}", config.cluster.management_node);
    println!("  managed nodes:   {}", config.cluster.nodes.len());
    for node in &config.cluster.nodes {
        println!("    {} ({})", node.hostname, node.model_path);
    }
    println!("  orchestrator:    {}", config.cli.binary);
    Ok(())
}
