//! Display sinks: where the final status line ends up.

use std::process::Stdio;

use async_trait::async_trait;
use statnot_core::{first_line, DisplayError, DisplaySink};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::config::{Config, DisplayKind};

/// Runs `argv` with the line appended as last argument.
///
/// The default sink is `xsetroot -name <line>`, which sets the root window
/// name that dwm shows in its bar.
pub struct CommandSink {
    argv: Vec<String>,
}

impl CommandSink {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    pub fn xsetroot() -> Self {
        Self::new(vec!["xsetroot".to_string(), "-name".to_string()])
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

#[async_trait]
impl DisplaySink for CommandSink {
    async fn show(&self, line: &str) -> Result<(), DisplayError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Ok(());
        };

        let status = Command::new(program)
            .args(args)
            .arg(first_line(line))
            .stdin(Stdio::null())
            .status()
            .await
            .map_err(|source| DisplayError::Spawn {
                command: self.argv.join(" "),
                source,
            })?;

        if !status.success() {
            return Err(DisplayError::ExitStatus {
                command: self.argv.join(" "),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Prints each line to stdout, for bars that read a pipe.
#[derive(Default)]
pub struct StdoutSink;

#[async_trait]
impl DisplaySink for StdoutSink {
    async fn show(&self, line: &str) -> Result<(), DisplayError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(first_line(line).as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok(())
    }
}

/// Build the sink selected by `[display]`.
pub fn from_config(config: &Config) -> Box<dyn DisplaySink> {
    match config.display.kind {
        DisplayKind::Xsetroot => Box::new(CommandSink::xsetroot()),
        DisplayKind::Command => Box::new(CommandSink::new(config.display_argv())),
        DisplayKind::Stdout => Box::new(StdoutSink),
    }
}
