//! Configuration management for the warden host.
//!
//! This module handles loading, validation, and command-line overrides of the
//! host configuration from a TOML file.
//!
//! ```toml
//! [logging]
//! level = "info"
//! json_format = false
//!
//! [bridge]
//! drain_on_eof_secs = 0
//!
//! [auto_tk_warn]
//! attacker_message = "Please apologise for ALL TKs in ALL chat!"
//! apology_keywords = ["sorry", "sry", "apologies", "my bad", "forgive me"]
//! ```

use crate::cli::CliArgs;
use plugin_auto_tk_warn::AutoTkWarnOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Log levels accepted in `[logging] level`.
pub const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Application configuration loaded from TOML file.
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging configuration settings
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Where game events come from and how the host ends
    #[serde(default)]
    pub bridge: BridgeSettings,
    /// Apology rule settings
    #[serde(default)]
    pub auto_tk_warn: AutoTkWarnOptions,
}

/// Logging configuration settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Whether to output logs in JSON format
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Console bridge settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeSettings {
    /// File to read event lines from; stdin when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Seconds to keep running after the input ends so due reminders and
    /// kicks still go out; 0 stops immediately
    pub drain_on_eof_secs: u64,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, creates a default configuration file at the
    /// specified path and returns the default configuration.
    pub async fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let default_config = AppConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            tokio::fs::write(path, toml_content).await?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Applies command-line overrides on top of the file settings.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(input) = &args.input {
            self.bridge.input = Some(input.clone());
        }

        if let Some(log_level) = &args.log_level {
            self.logging.level = log_level.clone();
        }

        if args.json_logs {
            self.logging.json_format = true;
        }
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Invalid log level: {}. Must be one of: {VALID_LOG_LEVELS:?}",
                &self.logging.level
            )));
        }

        if self.auto_tk_warn.reminder_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auto_tk_warn.reminder_message cannot be empty".to_string(),
            ));
        }

        if self.auto_tk_warn.thank_you_message.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "auto_tk_warn.thank_you_message cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_auto_tk_warn::ApologyMatcher;
    use tempfile::{NamedTempFile, TempDir};
    use tokio::fs;

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json_format);
        assert_eq!(config.bridge.input, None);
        assert_eq!(config.bridge.drain_on_eof_secs, 0);
        assert_eq!(config.auto_tk_warn, AutoTkWarnOptions::default());
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_from_nonexistent_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("warden.toml");

        let config = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(config, AppConfig::default());

        // The default file is written and reads back identically
        assert!(path.exists());
        let reloaded = AppConfig::load_from_file(&path).await.unwrap();
        assert_eq!(reloaded, config);
    }

    #[tokio::test]
    async fn test_load_from_existing_file() {
        let toml_content = r#"
[logging]
level = "debug"
json_format = true

[bridge]
input = "/var/run/squad/events.jsonl"
drain_on_eof_secs = 65

[auto_tk_warn]
victim_message = "You were teamkilled, an admin has been notified."
apology_keywords = ["sorry", "mb"]
thank_you_message = "Thanks!"
"#;

        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), toml_content).await.unwrap();

        let config = AppConfig::load_from_file(temp_file.path()).await.unwrap();

        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json_format);
        assert_eq!(config.bridge.input, Some(PathBuf::from("/var/run/squad/events.jsonl")));
        assert_eq!(config.bridge.drain_on_eof_secs, 65);
        assert_eq!(
            config.auto_tk_warn.victim_message(),
            Some("You were teamkilled, an admin has been notified.")
        );
        assert_eq!(config.auto_tk_warn.apology_keywords, vec!["sorry", "mb"]);
        assert_eq!(config.auto_tk_warn.thank_you_message, "Thanks!");
        // Unset plugin keys keep their defaults
        assert_eq!(config.auto_tk_warn.reminder_message, AutoTkWarnOptions::default().reminder_message);
    }

    #[tokio::test]
    async fn test_load_rejects_malformed_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[logging\nlevel = ").await.unwrap();

        let result = AppConfig::load_from_file(temp_file.path()).await;
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_invalid_log_level() {
        let mut config = AppConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut config = AppConfig::default();
            config.logging.level = level.to_string();
            assert!(config.validate().is_ok(), "{level} should be accepted");
        }
    }

    #[test]
    fn test_validation_empty_reminder() {
        let mut config = AppConfig::default();
        config.auto_tk_warn.reminder_message = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_keyword_list_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str("[auto_tk_warn]\napology_keywords = []\n").unwrap();
        assert!(config.validate().is_ok());

        let matcher = ApologyMatcher::new(&config.auto_tk_warn.apology_keywords);
        assert!(matcher.is_apology("SORRY!"));
    }

    #[test]
    fn test_cli_overrides() {
        let mut config = AppConfig::default();
        let args = CliArgs {
            config_path: PathBuf::from("warden.toml"),
            input: Some(PathBuf::from("events.jsonl")),
            log_level: Some("trace".to_string()),
            json_logs: true,
        };

        config.apply_cli_overrides(&args);
        assert_eq!(config.bridge.input, Some(PathBuf::from("events.jsonl")));
        assert_eq!(config.logging.level, "trace");
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_cli_without_overrides_keeps_file_settings() {
        let mut config = AppConfig::default();
        config.logging.json_format = true;
        let args = CliArgs {
            config_path: PathBuf::from("warden.toml"),
            input: None,
            log_level: None,
            json_logs: false,
        };

        config.apply_cli_overrides(&args);
        assert!(config.logging.json_format);
        assert_eq!(config.logging.level, "info");
    }
}
