//! Daemon configuration.
//!
//! Read once at startup from `~/.config/statnot/config.toml`. Every key is
//! optional; a missing file means the defaults below.
//!
//! # Example TOML
//!
//! ```toml
//! default_timeout_ms = 3000
//! max_timeout_ms = 5000
//! max_length = 100
//! status_interval_secs = 2.0
//! queue_notifications = true
//! use_status_text = true
//! status_command = ["/bin/sh", "~/.statusline.sh"]
//!
//! [display]
//! kind = "xsetroot"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use statnot_core::{QueueMode, RegistryConfig, SchedulerConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Where the final status line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayKind {
    /// `xsetroot -name <line>` (dwm and friends).
    #[default]
    Xsetroot,
    /// Run `display.command` with the line appended.
    Command,
    /// Print the line to stdout, for bars fed through a pipe.
    Stdout,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub kind: DisplayKind,
    pub command: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Timeout applied when a request asks for none or too much (ms).
    pub default_timeout_ms: u32,
    /// Longest timeout a request may ask for (ms).
    pub max_timeout_ms: u32,
    /// Characters kept per notification.
    pub max_length: usize,
    /// Seconds between forced status refreshes.
    pub status_interval_secs: f64,
    /// Scheduler granularity (ms).
    pub poll_interval_ms: u64,
    /// Show every notification in turn instead of only the latest.
    pub queue_notifications: bool,
    /// Compose the line with `status_command`; otherwise only notifications show.
    pub use_status_text: bool,
    /// Status command argv. The active notification is appended as last argument.
    pub status_command: Vec<String>,
    /// Kill the status command after this long (ms).
    pub status_timeout_ms: u64,
    /// Strip HTML tags and decode entities in summary and body.
    pub strip_markup: bool,
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_timeout_ms: 3000,
            max_timeout_ms: 5000,
            max_length: 100,
            status_interval_secs: 2.0,
            poll_interval_ms: 100,
            queue_notifications: true,
            use_status_text: true,
            status_command: vec!["/bin/sh".to_string(), "~/.statusline.sh".to_string()],
            status_timeout_ms: 5000,
            strip_markup: false,
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("statnot")
            .join("config.toml")
    }

    /// Load config from a file, or return defaults if it doesn't exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_length == 0 {
            return Err(ConfigError::Invalid("max_length must be at least 1".into()));
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_ms must be at least 1".into(),
            ));
        }
        if Duration::try_from_secs_f64(self.status_interval_secs).is_err() {
            return Err(ConfigError::Invalid(format!(
                "status_interval_secs must be a non-negative number of seconds, got {}",
                self.status_interval_secs
            )));
        }
        if self.use_status_text && self.status_command.is_empty() {
            return Err(ConfigError::Invalid(
                "status_command is empty but use_status_text is enabled".into(),
            ));
        }
        if self.display.kind == DisplayKind::Command && self.display.command.is_empty() {
            return Err(ConfigError::Invalid(
                "display.kind = \"command\" requires display.command".into(),
            ));
        }
        Ok(())
    }

    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            max_length: self.max_length,
            mode: QueueMode::from(self.queue_notifications),
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            status_interval: Duration::try_from_secs_f64(self.status_interval_secs)
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// Status command with a leading `~/` expanded to the home directory.
    pub fn status_argv(&self) -> Vec<String> {
        expand_home(&self.status_command)
    }

    pub fn display_argv(&self) -> Vec<String> {
        expand_home(&self.display.command)
    }
}

fn expand_home(argv: &[String]) -> Vec<String> {
    let home = dirs::home_dir();
    argv.iter()
        .map(|arg| match (arg.strip_prefix("~/"), &home) {
            (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
            _ => arg.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.registry_config().mode, QueueMode::Queue);
        assert_eq!(
            config.scheduler_config().status_interval,
            Duration::from_secs(2)
        );
        assert_eq!(
            config.scheduler_config().poll_interval,
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_toml(
            r#"
queue_notifications = false
use_status_text = false
status_interval_secs = 0.5

[display]
kind = "stdout"
"#,
        )
        .unwrap();
        assert_eq!(config.registry_config().mode, QueueMode::LatestOnly);
        assert!(!config.use_status_text);
        assert_eq!(
            config.scheduler_config().status_interval,
            Duration::from_millis(500)
        );
        assert_eq!(config.display.kind, DisplayKind::Stdout);
        assert_eq!(config.max_length, 100);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = Config::from_toml("update_text = \"xsetroot\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml("max_length = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("status_interval_secs = -1.0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("status_command = []"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("[display]\nkind = \"command\""),
            Err(ConfigError::Invalid(_))
        ));
        // An empty status command is fine when it is never run.
        assert!(Config::from_toml("use_status_text = false\nstatus_command = []").is_ok());
    }

    #[test]
    fn test_out_of_range_interval_rejected() {
        assert!(matches!(
            Config::from_toml("status_interval_secs = 1e20"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml("status_interval_secs = nan"),
            Err(ConfigError::Invalid(_))
        ));
        // Built in code rather than parsed: still no panic.
        let config = Config {
            status_interval_secs: 1e20,
            ..Config::default()
        };
        assert_eq!(config.scheduler_config().status_interval, Duration::MAX);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.display = DisplayConfig {
            kind: DisplayKind::Command,
            command: vec!["wmfs".into(), "-s".into()],
        };
        let text = config.to_toml().unwrap();
        assert!(text.contains("kind = \"command\""));
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_home_expansion() {
        let config = Config::default();
        let argv = config.status_argv();
        assert_eq!(argv[0], "/bin/sh");
        if dirs::home_dir().is_some() {
            assert!(!argv[1].starts_with("~/"));
            assert!(argv[1].ends_with(".statusline.sh"));
        }
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = std::env::temp_dir().join("statnot-test-does-not-exist.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }
}
