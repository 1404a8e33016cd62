//! xo-break CLI - pop-up tic-tac-toe breaks with reward points
//!
//! This CLI provides:
//! - Interactive matches in the terminal
//! - Virtual sessions against the pop-up scheduler
//! - Stored settings and points

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "xo-break")]
#[command(version, about = "Pop-up tic-tac-toe breaks with reward points", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play matches in the terminal
    Play(xo_break::cli::commands::play::PlayArgs),

    /// Run a virtual session with a random player
    Simulate(xo_break::cli::commands::simulate::SimulateArgs),

    /// Show stored reward points
    Points(xo_break::cli::commands::points::PointsArgs),

    /// Show or change stored settings
    Settings(xo_break::cli::commands::settings::SettingsArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xo_break=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => xo_break::cli::commands::play::execute(args),
        Commands::Simulate(args) => xo_break::cli::commands::simulate::execute(args),
        Commands::Points(args) => xo_break::cli::commands::points::execute(args),
        Commands::Settings(args) => xo_break::cli::commands::settings::execute(args),
    }
}
