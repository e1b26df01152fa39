//! Headless combat replay tool.
//!
//! Drives a [`combat_core::CombatEngine`] from authored data and a timed
//! replay script, or validates authored definitions.

mod commands;
mod config;
mod player;

use anyhow::Result;
use clap::Parser;
use commands::{Run, Validate};

/// Replay and validate combat content
#[derive(Parser)]
#[command(name = "combat-replay")]
#[command(about = "Headless combo replay and content validation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Play a replay script against a weapon
    Run(Run),

    /// Check weapon and special definitions for authoring issues
    Validate(Validate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (COMBAT_* overrides, RUST_LOG)
    let _ = dotenvy::dotenv();

    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(cmd) => cmd.execute(),
        Command::Validate(cmd) => cmd.execute(),
    }
}

/// Setup logging to stderr, INFO unless `RUST_LOG` says otherwise.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}
