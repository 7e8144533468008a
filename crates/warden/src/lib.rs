//! # warden - Teamkill Apology Host
//!
//! Runs the AutoTKWarn plugin against a game server adapter connected through
//! two pipes: game events arrive as JSON lines on stdin, RCON commands leave as
//! JSON lines on stdout. Logs go to stderr.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration (creates warden.toml if missing)
//! squad-adapter | warden | squad-rcon
//!
//! # Replay a recorded event log, keeping timers alive for 65s after it ends
//! warden --input events.jsonl --log-level debug
//!
//! # JSON logging for production
//! warden --json-logs
//! ```
//!
//! ## Signal Handling
//!
//! SIGINT (Ctrl+C) and SIGTERM stop reading input and unmount the plugin,
//! which cancels every pending apology. A second signal exits immediately.

use tracing::error;

mod app;
pub mod bridge;
pub mod cli;
pub mod config;
mod logging;
mod signals;

use app::Application;
use cli::CliArgs;
use config::AppConfig;

/// Main entry point for the warden host.
///
/// Parses the command line, loads the configuration (creating a default file
/// if missing), applies CLI overrides, sets up logging and runs the
/// application until the input ends or a shutdown signal arrives.
///
/// # Exit Codes
///
/// * **0**: Successful execution and shutdown
/// * **1**: Error during startup, configuration, or runtime
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let mut config = match AppConfig::load_from_file(&args.config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration from {}: {e}", args.config_path.display());
            std::process::exit(1);
        }
    };
    config.apply_cli_overrides(&args);

    // Setup logging before anything else
    if let Err(e) = logging::setup_logging(&config.logging, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        std::process::exit(1);
    }

    match Application::new(config) {
        Ok(app) => {
            if let Err(e) = app.run().await {
                error!("❌ Application error: {:?}", e);
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("❌ Failed to start application: {e:?}");
            std::process::exit(1);
        }
    }

    Ok(())
}

pub use bridge::{BridgeError, BridgeStats, EventLine, JsonLinesRcon};
pub use config::{BridgeSettings, ConfigError, LoggingSettings};

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_parsing() {
        let args = CliArgs::parse_from([
            "warden",
            "--config",
            "test.toml",
            "-i",
            "events.jsonl",
            "-l",
            "debug",
            "--json-logs",
        ]);

        assert_eq!(args.config_path, PathBuf::from("test.toml"));
        assert_eq!(args.input, Some(PathBuf::from("events.jsonl")));
        assert_eq!(args.log_level, Some("debug".to_string()));
        assert!(args.json_logs);
    }

    #[test]
    fn test_cli_defaults() {
        let args = CliArgs::parse_from(["warden"]);

        assert_eq!(args.config_path, PathBuf::from(cli::DEFAULT_CONFIG_PATH));
        assert_eq!(args.input, None);
        assert_eq!(args.log_level, None);
        assert!(!args.json_logs);
    }

    #[test]
    fn test_application_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        assert!(Application::new(config).is_err());
    }

    #[tokio::test]
    async fn test_config_file_round_trip_through_cli() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("warden.toml");
        let path_arg = path.to_string_lossy().to_string();
        let args = CliArgs::parse_from(["warden", "-c", path_arg.as_str(), "-l", "warn"]);

        let mut config = AppConfig::load_from_file(&args.config_path).await.unwrap();
        config.apply_cli_overrides(&args);

        assert!(path.exists());
        assert_eq!(config.logging.level, "warn");
        assert!(Application::new(config).is_ok());
    }
}
