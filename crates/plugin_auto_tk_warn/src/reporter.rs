//! Where failed RCON commands end up.
//!
//! Commands are fire-and-forget: a failure is never retried and never rolls
//! back tracker state. It is handed to a [`CommandFailureReporter`] instead.

use std::fmt::Debug;
use tracing::error;
use warden_event_system::{RconCommand, RconError};

pub trait CommandFailureReporter: Send + Sync + Debug {
    fn report(&self, command: &RconCommand, error: &RconError);
}

/// Logs failures through `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingFailureReporter;

impl CommandFailureReporter for TracingFailureReporter {
    fn report(&self, command: &RconCommand, error: &RconError) {
        error!("❌ RCON command for player {} failed: {} ({:?})", command.target(), error, command);
    }
}
