//! # Utility Functions

use crate::system::EventSystem;
use std::sync::Arc;

/// Returns the current Unix timestamp in seconds.
///
/// A clock set before the Unix epoch yields 0 rather than panicking.
pub fn current_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Creates a new, empty event system ready to be shared with plugins.
pub fn create_warden_event_system() -> Arc<EventSystem> {
    Arc::new(EventSystem::new())
}
