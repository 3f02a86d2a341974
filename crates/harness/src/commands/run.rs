//! `harness run` - execute scenarios against the configured cluster

use anyhow::{bail, Context, Result};
use comfy_table::Table;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info};

use command_runner::{SshConfig, SshRunner};
use harness_config::Config;
use harness_core::ScenarioContext;

pub async fn run(config_path: &Path, selected: Vec<String>) -> Result<()> {
    let config = harness_config::parse_file(config_path)
        .with_context(|| format!("invalid configuration: {}", config_path.display()))?;

    let names: Vec<&str> = if selected.is_empty() {
        harness::SCENARIOS.iter().map(|s| s.name).collect()
    } else {
        for name in &selected {
            if !harness::SCENARIOS.iter().any(|s| s.name == name.as_str()) {
                bail!("unknown scenario '{name}', see `harness list`");
            }
        }
        selected.iter().map(String::as_str).collect()
    };

    let runner = Arc::new(build_runner(&config));
    let ctx = ScenarioContext::new(config, runner);

    let mut table = Table::new();
    table.set_header(vec!["Scenario", "Result", "Duration"]);
    let mut failures = 0usize;

    for name in names {
        info!(scenario = name, "starting scenario");
        let started = Instant::now();
        let outcome = harness::run_scenario(name, &ctx).await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(()) => {
                info!(scenario = name, ?elapsed, "scenario passed");
                table.add_row(vec![name.to_string(), "PASS".to_string(), fmt_duration(elapsed)]);
            }
            Err(e) => {
                error!(scenario = name, error = %e, "scenario failed");
                failures += 1;
                table.add_row(vec![
                    name.to_string(),
                    format!("FAIL: {e}"),
                    fmt_duration(elapsed),
                ]);
            }
        }
    }

    println!("{table}");

    if failures > 0 {
        bail!("{failures} scenario(s) failed");
    }
    Ok(())
}

/// Register every cluster host with the SSH runner
fn build_runner(config: &Config) -> SshRunner {
    let mut runner = SshRunner::with_timeout(Duration::from_secs(config.cli.command_timeout));
    let connection = &config.cluster.connection;

    let make = |hostname: &str| {
        let mut ssh = SshConfig::new(hostname);
        if let Some(user) = &connection.user {
            ssh = ssh.with_user(user);
        }
        if let Some(port) = connection.port {
            ssh = ssh.with_port(port);
        }
        if let Some(identity) = &connection.identity_file {
            ssh = ssh.with_identity_file(identity);
        }
        for arg in &connection.extra_args {
            ssh = ssh.with_extra_arg(arg);
        }
        ssh
    };

    runner.add_host(
        config.cluster.management_node.clone(),
        make(&config.cluster.management_node),
    );
    for node in &config.cluster.nodes {
        runner.add_host(node.hostname.clone(), make(&node.hostname));
    }
    runner
}

fn fmt_duration(elapsed: Duration) -> String {
    format!("{:.1}s", elapsed.as_secs_f64())
}
