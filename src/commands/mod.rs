//! Command handlers for the CLI application.
//!
//! - `client`: talk to a running daemon over D-Bus (send, close, info)
//! - `config`: inspect the configuration

pub mod client;
pub mod config;

/// Result type for command handlers
pub type CommandResult = anyhow::Result<()>;
