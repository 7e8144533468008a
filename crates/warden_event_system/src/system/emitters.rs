//! Event emission methods
use crate::events::{Event, EventError};
use super::core::EventSystem;
use compact_str::CompactString;
use futures::stream::{FuturesUnordered, StreamExt};
use tracing::{debug, error};

impl EventSystem {
    /// Emits a core server event to all registered handlers.
    ///
    /// Handlers run concurrently and the call returns once all of them have
    /// returned. A failing handler is logged and counted; it never prevents
    /// the others from running and is not reported to the emitter.
    #[inline]
    pub async fn emit_core<T>(&self, event_name: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let event_key = CompactString::new_inline("core:") + event_name;
        self.emit_event(&event_key, event).await
    }

    /// Internal emit function shared by every emit helper.
    async fn emit_event<T>(&self, event_key: &str, event: &T) -> Result<(), EventError>
    where
        T: Event,
    {
        let data = event.serialize()?;

        // Clone the handler list out so the map shard is not held across awaits
        let event_handlers = self.handlers.get(event_key).map(|entry| entry.value().clone());

        let Some(event_handlers) = event_handlers else {
            debug!("📭 No handlers for event: {}", event_key);
            return Ok(());
        };

        debug!("📤 Emitting {} to {} handlers", event_key, event_handlers.len());

        let mut futures = FuturesUnordered::new();
        for registered in event_handlers.iter() {
            let data = &data;
            futures.push(async move {
                let result = registered.handler.handle(data).await;
                if let Err(e) = &result {
                    error!("❌ Handler {} failed: {}", registered.handler.handler_name(), e);
                }
                result.is_err()
            });
        }

        let mut failures = 0u64;
        while let Some(failed) = futures.next().await {
            if failed {
                failures += 1;
            }
        }

        let mut stats = self.stats.write().await;
        stats.events_emitted += 1;
        stats.handler_failures += failures;
        Ok(())
    }
}
