//! Core EventSystem implementation
use crate::events::EventHandler;
use super::stats::EventSystemStats;
use compact_str::CompactString;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;

/// Identifies one handler registration so it can be removed again.
///
/// Ids are never reused within one event system, so unsubscribing with a
/// stale id can never remove somebody else's handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(pub(super) u64);

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handler#{}", self.0)
    }
}

/// A handler together with the id it was registered under.
#[derive(Debug, Clone)]
pub(super) struct RegisteredHandler {
    pub(super) id: HandlerId,
    pub(super) handler: Arc<dyn EventHandler>,
}

/// The event system that routes host notifications to plugin handlers.
///
/// Uses DashMap for lock-free concurrent access to handlers so that emitting
/// never contends with unrelated registrations.
pub struct EventSystem {
    /// Map of event keys to their registered handlers
    pub(super) handlers: DashMap<CompactString, Vec<RegisteredHandler>>,
    /// Source of handler ids
    pub(super) next_handler_id: AtomicU64,
    /// System statistics for monitoring
    pub(super) stats: tokio::sync::RwLock<EventSystemStats>,
}

impl fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSystem")
            .field("handlers", &"[handlers]")
            .field("stats", &"[stats]")
            .finish()
    }
}

impl EventSystem {
    /// Creates a new event system with no registered handlers.
    pub fn new() -> Self {
        Self {
            handlers: DashMap::new(),
            next_handler_id: AtomicU64::new(1),
            stats: tokio::sync::RwLock::new(EventSystemStats::default()),
        }
    }

    /// Gets the current event system statistics
    #[inline]
    pub async fn get_stats(&self) -> EventSystemStats {
        self.stats.read().await.clone()
    }

    /// Number of handlers currently registered for a core event.
    pub fn core_handler_count(&self, event_name: &str) -> usize {
        let event_key = CompactString::new_inline("core:") + event_name;
        self.handlers
            .get(event_key.as_str())
            .map(|entry| entry.value().len())
            .unwrap_or(0)
    }
}

impl Default for EventSystem {
    fn default() -> Self {
        Self::new()
    }
}
