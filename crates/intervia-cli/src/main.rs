//! Intervia CLI entry point.
//!
//! Binary name: `ivia`
//!
//! Parses CLI arguments, loads configuration, picks an evaluation oracle,
//! then hands off to the interactive interview loop.

mod interview;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ivia", version, about = "Timed technical interviews in the terminal")]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all logs except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive interview session
    Interview {
        /// Resume file to ingest before the session (.pdf, .txt, or .md)
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Use the deterministic offline oracle instead of the LLM
        #[arg(long)]
        offline: bool,

        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,intervia=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    match cli.command {
        Commands::Interview {
            resume,
            offline,
            config,
        } => interview::run(resume.as_deref(), offline, config.as_deref()).await,
    }
}
