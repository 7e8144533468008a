//! # Auto TK Warn Plugin
//!
//! Automatically warns players when they teamkill. If they do not apologize in
//! chat within 60 seconds, they are kicked.
//!
//! ## Behaviour
//!
//! | time after teamkill | still no apology | command |
//! |---------------------|------------------|---------|
//! | 0s                  | -                | warn attacker (`attacker_message`), warn victim (`victim_message`, if set) |
//! | 30s                 | yes              | warn attacker (`reminder_message`) |
//! | 60s                 | yes              | kick attacker ([`KICK_REASON`]) |
//!
//! A chat line containing any apology keyword from a player with a pending
//! apology cancels both timers and thanks them (`thank_you_message`). Another
//! teamkill before that restarts the clock.
//!
//! ## Module Organization
//!
//! - [`tracker`] - the pending-apology state machine and its timers
//! - [`options`] - plugin configuration and defaults
//! - [`apology`] - keyword matching
//! - [`reporter`] - where failed RCON commands are reported

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;
use warden_event_system::{LogLevel, PluginError, ServerContext, SimplePlugin};

pub mod apology;
mod dispatch;
pub mod error;
pub mod options;
pub mod reporter;
pub mod tracker;


pub use apology::ApologyMatcher;
pub use dispatch::COMMAND_TIMEOUT;
pub use error::TrackerError;
pub use options::AutoTkWarnOptions;
pub use reporter::{CommandFailureReporter, TracingFailureReporter};
pub use tracker::{ApologyTracker, KICK_DELAY, KICK_REASON, REMINDER_DELAY};

/// Plugin wrapper that owns one [`ApologyTracker`] per mount.
///
/// The tracker is built on mount, against the RCON channel the host context
/// provides, and torn down on unmount together with every pending apology.
pub struct AutoTkWarnPlugin {
    name: String,
    options: AutoTkWarnOptions,
    reporter: Arc<dyn CommandFailureReporter>,
    tracker: Option<ApologyTracker>,
}

impl AutoTkWarnPlugin {
    pub fn new(options: AutoTkWarnOptions) -> Self {
        Self::with_reporter(options, Arc::new(TracingFailureReporter))
    }

    pub fn with_reporter(options: AutoTkWarnOptions, reporter: Arc<dyn CommandFailureReporter>) -> Self {
        debug!("🚨 AutoTkWarnPlugin: Creating new instance");
        Self {
            name: "AutoTKWarn".to_string(),
            options,
            reporter,
            tracker: None,
        }
    }

    /// The live tracker, while mounted.
    pub fn tracker(&self) -> Option<&ApologyTracker> {
        self.tracker.as_ref()
    }

    pub fn options(&self) -> &AutoTkWarnOptions {
        &self.options
    }
}

impl Default for AutoTkWarnPlugin {
    fn default() -> Self {
        Self::new(AutoTkWarnOptions::default())
    }
}

#[async_trait]
impl SimplePlugin for AutoTkWarnPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> &str {
        env!("CARGO_PKG_VERSION")
    }

    async fn mount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        if self.tracker.is_some() {
            return Err(PluginError::InitializationFailed(format!("{} is already mounted", self.name)));
        }

        let tracker = ApologyTracker::with_reporter(self.options.clone(), context.rcon(), self.reporter.clone())
            .map_err(|e| PluginError::InitializationFailed(e.to_string()))?;
        tracker
            .start(&context.events())
            .await
            .map_err(|e| PluginError::InitializationFailed(e.to_string()))?;

        self.tracker = Some(tracker);
        context.log(LogLevel::Info, "🚨 AutoTKWarn plugin mounted.");
        Ok(())
    }

    async fn unmount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
        let tracker = self.tracker.take().ok_or(PluginError::NotMounted)?;
        let cancelled = tracker
            .stop(&context.events())
            .await
            .map_err(|e| PluginError::ExecutionError(e.to_string()))?;

        context.log(
            LogLevel::Info,
            &format!("🚨 AutoTKWarn plugin unmounted. {cancelled} pending apologies cancelled."),
        );
        Ok(())
    }
}
