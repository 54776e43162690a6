//! Status text from an external command.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use statnot_core::{first_line, StatusError, StatusSource};
use tokio::process::Command;
use tokio::time::timeout;

/// Runs the configured command and reads the first line of its stdout.
///
/// When a notification is active its text is passed as the last argument,
/// e.g. `$1` in a shell script.
pub struct CommandStatusSource {
    argv: Vec<String>,
    timeout: Duration,
}

impl CommandStatusSource {
    pub fn new(argv: Vec<String>, timeout: Duration) -> Self {
        Self { argv, timeout }
    }

    fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

#[async_trait]
impl StatusSource for CommandStatusSource {
    async fn status(&self, notification: Option<&str>) -> Result<String, StatusError> {
        let Some((program, args)) = self.argv.split_first() else {
            return Err(StatusError::NoCommand);
        };

        let mut cmd = Command::new(program);
        cmd.args(args)
            .args(notification)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|source| StatusError::Spawn {
            command: self.command_line(),
            source,
        })?;

        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|source| StatusError::Spawn {
                command: self.command_line(),
                source,
            })?,
            Err(_) => {
                return Err(StatusError::Timeout {
                    command: self.command_line(),
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        if !output.status.success() {
            return Err(StatusError::ExitStatus {
                command: self.command_line(),
                status: output.status.to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let line = first_line(&stdout);
        if line.is_empty() {
            return Err(StatusError::EmptyOutput(self.command_line()));
        }
        Ok(line.to_string())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> CommandStatusSource {
        CommandStatusSource::new(
            vec!["/bin/sh".into(), "-c".into(), script.into(), "statusline".into()],
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_notification_is_last_argument() {
        let source = sh(r#"if [ -n "$1" ]; then echo "[$1] up"; else echo up; fi"#);
        assert_eq!(source.status(None).await.unwrap(), "up");
        assert_eq!(source.status(Some("mail")).await.unwrap(), "[mail] up");
    }

    #[tokio::test]
    async fn test_only_first_line() {
        let source = sh("printf 'one\\ntwo\\n'");
        assert_eq!(source.status(None).await.unwrap(), "one");
    }

    #[tokio::test]
    async fn test_failures() {
        assert!(matches!(
            sh("exit 3").status(None).await,
            Err(StatusError::ExitStatus { .. })
        ));
        assert!(matches!(
            sh("true").status(None).await,
            Err(StatusError::EmptyOutput(_))
        ));

        let missing = CommandStatusSource::new(
            vec!["/nonexistent/statusline".into()],
            Duration::from_secs(1),
        );
        assert!(matches!(
            missing.status(None).await,
            Err(StatusError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_argv_is_not_run() {
        let source = CommandStatusSource::new(Vec::new(), Duration::from_secs(1));
        let err = source.status(Some("mail")).await.unwrap_err();
        assert!(matches!(err, StatusError::NoCommand));
        assert_eq!(err.to_string(), "no status command configured");
    }

    #[tokio::test]
    async fn test_hung_command_times_out() {
        let source = CommandStatusSource::new(
            vec!["/bin/sh".into(), "-c".into(), "sleep 10".into()],
            Duration::from_millis(100),
        );
        assert!(matches!(
            source.status(None).await,
            Err(StatusError::Timeout { .. })
        ));
    }
}
