//! Event handler registration methods
use crate::events::{Event, EventError, EventHandler, TypedEventHandler};
use super::core::{EventSystem, HandlerId, RegisteredHandler};
use compact_str::CompactString;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{debug, info};

impl EventSystem {
    /// Registers a handler for core server events.
    ///
    /// Returns the id to pass to [`EventSystem::off`] when the handler should
    /// stop receiving events.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use warden_event_system::{EventSystem, ChatMessageEvent, CHAT_MESSAGE};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let events = EventSystem::new();
    /// let id = events.on_core(CHAT_MESSAGE, |event: ChatMessageEvent| {
    ///     println!("{:?} said {:?}", event.steam_id, event.message);
    ///     Ok(())
    /// }).await?;
    /// assert!(events.off(id).await);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn on_core<T, F>(&self, event_name: &str, handler: F) -> Result<HandlerId, EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + Clone + 'static,
    {
        let event_key = CompactString::new_inline("core:") + event_name;
        self.register_typed_handler(event_key, handler).await
    }

    /// Removes a previously registered handler.
    ///
    /// Returns `false` if no handler with this id is registered, which makes
    /// unsubscribing twice harmless.
    pub async fn off(&self, id: HandlerId) -> bool {
        let mut removed = false;
        for mut entry in self.handlers.iter_mut() {
            let before = entry.value().len();
            entry.value_mut().retain(|registered| registered.id != id);
            if entry.value().len() != before {
                removed = true;
                debug!("🗑️ Removed {} from {}", id, entry.key());
                break;
            }
        }

        if removed {
            self.handlers.retain(|_, registered| !registered.is_empty());
            let mut stats = self.stats.write().await;
            stats.total_handlers = stats.total_handlers.saturating_sub(1);
        }
        removed
    }

    /// Internal helper for registering typed handlers.
    async fn register_typed_handler<T, F>(
        &self,
        event_key: CompactString,
        handler: F,
    ) -> Result<HandlerId, EventError>
    where
        T: Event + 'static,
        F: Fn(T) -> Result<(), EventError> + Send + Sync + Clone + 'static,
    {
        let id = HandlerId(self.next_handler_id.fetch_add(1, Ordering::Relaxed));
        let handler_name = format!("{}::{}", event_key, T::type_name());
        let typed_handler = TypedEventHandler::new(handler_name, handler);
        let handler_arc: Arc<dyn EventHandler> = Arc::new(typed_handler);

        self.handlers
            .entry(event_key.clone())
            .or_default()
            .push(RegisteredHandler { id, handler: handler_arc });

        let mut stats = self.stats.write().await;
        stats.total_handlers += 1;

        info!("📝 Registered {} for {}", id, event_key);
        Ok(id)
    }
}
