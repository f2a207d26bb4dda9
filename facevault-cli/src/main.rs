//! Facevault CLI - biometric banking in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{config, register, session};

/// Facevault - biometric banking in your terminal
#[derive(Parser)]
#[command(name = "fv", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Enroll a new account
    Register {
        /// Image file standing in for the camera feed
        #[arg(long, env = "FACEVAULT_IMAGE")]
        image: PathBuf,
        /// Full name (prompted if omitted)
        #[arg(long)]
        name: Option<String>,
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign in and open the session dashboard
    Login {
        /// Image file standing in for the camera feed
        #[arg(long, env = "FACEVAULT_IMAGE")]
        image: PathBuf,
        /// Account number (prompted if omitted)
        #[arg(long)]
        account: Option<String>,
    },

    /// Show or update configuration
    Config {
        /// Set the banking API base URL (must be https)
        #[arg(long)]
        api_url: Option<String>,
        /// Set the security monitor interval in seconds
        #[arg(long)]
        poll_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { image, name, email } => register::run(&image, name, email).await,
        Commands::Login { image, account } => session::run(&image, account).await,
        Commands::Config { api_url, poll_secs } => config::run(api_url, poll_secs),
    }
}
