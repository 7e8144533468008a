//! Logging system setup and configuration.
//!
//! Logs always go to stderr: stdout carries the RCON command stream and must
//! contain nothing else.

use crate::config::LoggingSettings;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the logging system with the specified configuration.
///
/// `RUST_LOG`, if set, takes precedence over the configured level. JSON
/// output is used when either the file or the CLI asks for it.
pub fn setup_logging(
    config: &LoggingSettings,
    json_format: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = config.level.as_str();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if json_format || config.json_format {
        registry
            .with(fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_file(false)
                .with_line_number(false)
                .with_thread_ids(true)
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_file(false)
                .with_line_number(false)
                .with_target(true)
            )
            .try_init()?;
    }

    info!("🔧 Logging initialized with level: {}", log_level);
    Ok(())
}

/// Displays the startup banner through the log.
pub fn display_banner() {
    let version = option_env!("CARGO_PKG_VERSION").unwrap_or("UNK");
    info!("╔══════════════════════════════════════════╗");
    info!("║             🛡️  TK WARDEN 🛡️              ║");
    info!("║                 v{:<24}║", version);
    info!("║                                          ║");
    info!("║  Teamkill → warn → remind → kick         ║");
    info!("║  unless the attacker says sorry          ║");
    info!("╚══════════════════════════════════════════╝");
}
