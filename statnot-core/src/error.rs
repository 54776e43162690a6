//! Collaborator error types

use thiserror::Error;

/// Errors from the external status command.
///
/// Never fatal: the scheduler falls back to the raw notification text
/// for the tick that produced it.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("no status command configured")]
    NoCommand,

    #[error("could not run status command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("status command `{command}` exited with {status}")]
    ExitStatus { command: String, status: String },

    #[error("status command `{0}` produced no output")]
    EmptyOutput(String),

    #[error("status command `{command}` timed out after {timeout_ms} ms")]
    Timeout { command: String, timeout_ms: u64 },
}

/// Errors from rendering a line on the display.
#[derive(Error, Debug)]
pub enum DisplayError {
    #[error("could not run display command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("display command `{command}` exited with {status}")]
    ExitStatus { command: String, status: String },

    #[error("display I/O error: {0}")]
    Io(#[from] std::io::Error),
}
