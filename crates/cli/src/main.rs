//! agentrelay CLI, the main entry point.
//!
//! Runs one challenge through the main agent and its sub-agents:
//! - `agentrelay [--challenge <text>]`  Run the orchestrator (default)
//! - `agentrelay init`                  Write a starter config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "agentrelay",
    about = "agentrelay: a main agent delegating to tools, code and text sub-agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the orchestrator config file [default: ~/.agentrelay/multi-agent.toml]
    #[arg(short, long, global = true, env = "AGENTRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Challenge prompt (otherwise read from stdin, or the built-in default)
    #[arg(long)]
    challenge: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(agentrelay_config::RelayConfig::default_path);

    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(&config_path, force)?,
        None => commands::run::run(&config_path, cli.challenge).await?,
    }

    Ok(())
}
