//! statnot CLI
//!
//! Runs the notification daemon, or talks to a running one.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use statnot::config::Config;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli.config.unwrap_or_else(Config::default_path);

    match cli.command {
        None | Some(Commands::Daemon) => {
            info!("Loading config from {:?}", config_path);
            let config = Config::load(&config_path)?;
            statnot::daemon::run(config).await?;
        }
        Some(Commands::Send {
            summary,
            body,
            id,
            timeout,
            app,
        }) => {
            commands::client::send(&app, &summary, &body, id, timeout).await?;
        }
        Some(Commands::Close { id }) => {
            commands::client::close(id).await?;
        }
        Some(Commands::Info) => {
            commands::client::info().await?;
        }
        Some(Commands::PrintConfig { default }) => {
            commands::config::print(&config_path, default)?;
        }
    }

    Ok(())
}
