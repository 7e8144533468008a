//! # Server Context Interface
//!
//! The context is the bridge between plugin code and the host: it hands a
//! plugin the event system to subscribe on and the remote-control channel to
//! send commands through.
//!
//! ## Thread Safety
//!
//! All context operations are thread-safe and can be called from multiple
//! tasks concurrently.

use crate::rcon::RconCommands;
use crate::system::EventSystem;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

// ============================================================================
// Server Context Interface (Minimal)
// ============================================================================

pub trait ServerContext: Send + Sync + Debug {
    fn events(&self) -> Arc<EventSystem>;

    fn rcon(&self) -> Arc<dyn RconCommands>;

    fn log(&self, level: LogLevel, message: &str);
}

// ============================================================================
// Supporting Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Context backed by an event system and an RCON handle, logging through
/// `tracing` under the `plugin` target.
#[derive(Debug, Clone)]
pub struct BasicServerContext {
    event_system: Arc<EventSystem>,
    rcon: Arc<dyn RconCommands>,
}

impl BasicServerContext {
    pub fn new(event_system: Arc<EventSystem>, rcon: Arc<dyn RconCommands>) -> Self {
        Self { event_system, rcon }
    }
}

impl ServerContext for BasicServerContext {
    fn events(&self) -> Arc<EventSystem> {
        self.event_system.clone()
    }

    fn rcon(&self) -> Arc<dyn RconCommands> {
        self.rcon.clone()
    }

    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Error => error!(target: "plugin", "{message}"),
            LogLevel::Warn => warn!(target: "plugin", "{message}"),
            LogLevel::Info => info!(target: "plugin", "{message}"),
            LogLevel::Debug => debug!(target: "plugin", "{message}"),
            LogLevel::Trace => trace!(target: "plugin", "{message}"),
        }
    }
}
