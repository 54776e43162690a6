// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "statnot")]
#[command(author, version, about = "Status and notifications for lightweight window managers")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/statnot/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the notification daemon (default)
    #[command(visible_alias = "d")]
    Daemon,

    /// Post a notification to the running daemon
    #[command(visible_alias = "s")]
    Send {
        /// Summary line
        summary: String,
        /// Body text
        #[arg(default_value = "")]
        body: String,
        /// Replace the notification with this id (0 = new)
        #[arg(long, default_value = "0")]
        id: u32,
        /// Timeout in milliseconds (-1 = daemon default, 0 = until superseded)
        #[arg(short, long, default_value = "-1", allow_hyphen_values = true)]
        timeout: i32,
        /// Application name sent with the notification
        #[arg(long, default_value = "statnot")]
        app: String,
    },

    /// Ask the daemon to close a notification
    Close {
        /// Notification id
        id: u32,
    },

    /// Show server information and capabilities of the running daemon
    Info,

    /// Print the configuration as TOML
    PrintConfig {
        /// Print built-in defaults instead of the loaded file
        #[arg(long)]
        default: bool,
    },
}
