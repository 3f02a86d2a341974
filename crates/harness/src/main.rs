//! Deployment acceptance harness CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "harness")]
#[command(about = "Deployment acceptance harness - drives the orchestrator CLI over SSH")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "harness.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the harness configuration file
    Validate,

    /// List the known scenarios
    List,

    /// Run scenarios against the configured cluster
    Run {
        /// Scenarios to run (empty means all)
        scenarios: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    smol::block_on(async {
        let cli = Cli::parse();

        match cli.command {
            Commands::Validate => commands::validate::run(&cli.config).await,
            Commands::List => commands::list::run().await,
            Commands::Run { scenarios } => commands::run::run(&cli.config, scenarios).await,
        }
    })
}
