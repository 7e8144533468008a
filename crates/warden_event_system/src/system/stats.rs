//! Statistics tracking for the event system
use serde::{Deserialize, Serialize};

/// Core event system statistics for monitoring
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EventSystemStats {
    /// Total number of registered event handlers
    pub total_handlers: usize,
    /// Total number of events delivered to at least one handler
    pub events_emitted: u64,
    /// Handler invocations that returned an error
    pub handler_failures: u64,
}
