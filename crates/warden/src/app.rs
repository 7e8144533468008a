//! Main application logic and lifecycle management.
//!
//! The `Application` wires one [`AutoTkWarnPlugin`] to the console bridge and
//! runs it until the input ends or a termination signal arrives.

use crate::bridge::{pump_events, BridgeStats, JsonLinesRcon};
use crate::config::AppConfig;
use crate::logging::display_banner;
use crate::signals::{setup_signal_handlers, wait_for_signal};
use plugin_auto_tk_warn::{AutoTkWarnPlugin, KICK_DELAY, REMINDER_DELAY};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{error, info, warn};
use warden_event_system::{
    create_warden_event_system, BasicServerContext, EventSystem, ServerContext, ShutdownState,
    SimplePlugin,
};

/// Main application struct.
///
/// Owns the validated configuration; everything else is created in
/// [`Application::run`] and torn down before it returns.
pub struct Application {
    config: AppConfig,
}

/// How the input phase of a run ended.
enum InputOutcome {
    Exhausted(BridgeStats),
    Interrupted,
}

impl Application {
    /// Creates a new application from an already loaded configuration.
    ///
    /// The configuration is validated here; CLI overrides must already be
    /// applied.
    pub fn new(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        Ok(Self { config })
    }

    /// Runs the host until the input ends or a shutdown signal arrives.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting warden");
        self.log_configuration_summary();

        let events = create_warden_event_system();
        let rcon = Arc::new(JsonLinesRcon::new(tokio::io::stdout()));
        let context: Arc<dyn ServerContext> =
            Arc::new(BasicServerContext::new(events.clone(), rcon));

        let mut plugin = AutoTkWarnPlugin::new(self.config.auto_tk_warn.clone());
        plugin.mount(context.clone()).await?;
        info!("🔌 Plugin {} v{} mounted", plugin.name(), plugin.version());

        let shutdown_state = ShutdownState::new();
        let reader = self.open_input().await?;

        info!("✅ warden is now running!");
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        let outcome = tokio::select! {
            result = pump_events(reader, &events, &shutdown_state) => InputOutcome::Exhausted(result?),
            signal = setup_signal_handlers(&shutdown_state) => {
                signal?;
                InputOutcome::Interrupted
            }
        };

        if let InputOutcome::Exhausted(stats) = outcome {
            info!(
                "📭 Input ended: {} events dispatched, {} lines skipped",
                stats.dispatched, stats.skipped
            );
            self.drain(&shutdown_state).await;
        }

        // A second signal from here on ends the process at once
        tokio::spawn(async move {
            if let Err(e) = wait_for_signal().await {
                error!("Failed to set up merciless shutdown signal handler: {e}");
                return;
            }

            warn!("Shutdown handler received again! I'll make this quick.");
            std::process::exit(1);
        });

        info!("🔌 Unmounting plugins...");
        if let Err(e) = plugin.unmount(context).await {
            error!("❌ Plugin shutdown failed: {}", e);
        } else {
            info!("✅ Plugin shutdown completed successfully");
        }

        log_final_statistics(&events).await;
        info!("✅ warden shutdown complete");
        Ok(())
    }

    /// Keeps timers running for the configured drain period after EOF.
    async fn drain(&self, shutdown_state: &ShutdownState) {
        let drain = Duration::from_secs(self.config.bridge.drain_on_eof_secs);
        if drain.is_zero() {
            return;
        }

        info!("⏳ Draining for {}s so pending reminders and kicks can go out", drain.as_secs());
        tokio::select! {
            _ = tokio::time::sleep(drain) => info!("⏰ Drain period over"),
            signal = setup_signal_handlers(shutdown_state) => {
                if let Err(e) = signal {
                    error!("❌ Signal handling failed during drain: {e}");
                }
            }
        }
    }

    async fn open_input(&self) -> std::io::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
        match &self.config.bridge.input {
            Some(path) => {
                info!("📂 Reading events from {}", path.display());
                let file = tokio::fs::File::open(path).await?;
                Ok(Box::new(BufReader::new(file)))
            }
            None => {
                info!("📥 Reading events from stdin");
                Ok(Box::new(BufReader::new(tokio::io::stdin())))
            }
        }
    }

    /// Logs the configuration summary at startup.
    fn log_configuration_summary(&self) {
        let options = &self.config.auto_tk_warn;
        info!("📋 Configuration Summary:");
        info!(
            "  📥 Input: {}",
            self.config
                .bridge
                .input
                .as_ref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "stdin".to_string())
        );
        info!("  ⏳ Drain on EOF: {}s", self.config.bridge.drain_on_eof_secs);
        info!(
            "  ⏱️ Reminder after {}s, kick after {}s",
            REMINDER_DELAY.as_secs(),
            KICK_DELAY.as_secs()
        );
        info!("  🔫 Attacker notice: {}", options.attacker_message().unwrap_or("(disabled)"));
        info!("  🩹 Victim notice: {}", options.victim_message().unwrap_or("(disabled)"));
        info!("  🙏 Apology keywords: {:?}", options.apology_keywords);
    }
}

/// Logs final statistics during shutdown.
async fn log_final_statistics(events: &EventSystem) {
    info!("📊 Final Statistics:");
    let final_stats = events.get_stats().await;
    info!("  - Total events processed: {}", final_stats.events_emitted);
    info!("  - Handler failures: {}", final_stats.handler_failures);
}
