//! Shutdown coordination.
//!
//! Shared flag telling the input bridge to stop feeding events once the host
//! has decided to shut down, so plugins are unmounted against a quiet system.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Shared shutdown state for coordinating graceful shutdown across components.
#[derive(Debug, Clone)]
pub struct ShutdownState {
    /// Flag indicating shutdown has been initiated - no new events should be processed
    shutdown_initiated: Arc<AtomicBool>,
}

impl ShutdownState {
    pub fn new() -> Self {
        Self {
            shutdown_initiated: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Returns true if shutdown has been initiated - no new events should be processed.
    pub fn is_shutdown_initiated(&self) -> bool {
        self.shutdown_initiated.load(Ordering::Acquire)
    }

    /// Initiates shutdown - sets the flag to stop accepting new events.
    pub fn initiate_shutdown(&self) {
        self.shutdown_initiated.store(true, Ordering::Release);
        info!("🛑 Shutdown initiated - no new events will be processed");
    }
}

impl Default for ShutdownState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_flag_is_shared_between_clones() {
        let state = ShutdownState::new();
        let observer = state.clone();
        assert!(!observer.is_shutdown_initiated());

        state.initiate_shutdown();
        assert!(observer.is_shutdown_initiated());
    }
}
