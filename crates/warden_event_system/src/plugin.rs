//! # Plugin System Interface
//!
//! Moderation rules are written as plugins. A plugin subscribes its handlers
//! when it is mounted and must release everything it holds when unmounted.
//!
//! ## Plugin Lifecycle
//!
//! 1. **Creation** - Plugin instance created with its options
//! 2. **Mount** - Handlers subscribed on the context's event system
//! 3. **Operation** - Events processed, commands sent through the context
//! 4. **Unmount** - Handlers unsubscribed, scheduled work cancelled
//!
//! No state is carried from one mount to the next.

use crate::context::ServerContext;
use async_trait::async_trait;
use std::sync::Arc;

/// Plugin trait implemented by moderation rules.
///
/// # Examples
///
/// ```rust,no_run
/// use warden_event_system::*;
///
/// struct ChatEcho {
///     subscription: Option<HandlerId>,
/// }
///
/// #[async_trait]
/// impl SimplePlugin for ChatEcho {
///     fn name(&self) -> &str { "chat_echo" }
///     fn version(&self) -> &str { "1.0.0" }
///
///     async fn mount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
///         let id = context.events().on_core(CHAT_MESSAGE, |event: ChatMessageEvent| {
///             tracing::info!("chat: {:?}", event.message);
///             Ok(())
///         }).await.map_err(|e| PluginError::InitializationFailed(e.to_string()))?;
///         self.subscription = Some(id);
///         Ok(())
///     }
///
///     async fn unmount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError> {
///         let id = self.subscription.take().ok_or(PluginError::NotMounted)?;
///         context.events().off(id).await;
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait SimplePlugin: Send + Sync + 'static {
    /// Returns the name of this plugin, stable across versions.
    fn name(&self) -> &str;

    /// Returns the version string of this plugin.
    fn version(&self) -> &str;

    /// Subscribes the plugin's handlers and prepares its state.
    async fn mount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError>;

    /// Unsubscribes the plugin's handlers and releases its state.
    ///
    /// Errors are logged by the host but never prevent shutdown.
    async fn unmount(&mut self, context: Arc<dyn ServerContext>) -> Result<(), PluginError>;
}

/// Errors raised during plugin lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// Plugin initialization failed during mount
    #[error("Plugin initialization failed: {0}")]
    InitializationFailed(String),
    /// Error occurred during plugin execution
    #[error("Plugin execution error: {0}")]
    ExecutionError(String),
    /// Unmount was requested for a plugin that is not mounted
    #[error("Plugin is not mounted")]
    NotMounted,
}
