//! # Warden Event System
//!
//! Host-side plumbing for game server moderation plugins. The crate provides
//! the pieces a plugin is wired into without knowing anything about the game
//! server itself:
//!
//! - **Events**: the [`Event`] trait, typed handlers and the game events a
//!   moderation plugin reacts to ([`TeamkillEvent`], [`ChatMessageEvent`])
//! - **Dispatch**: [`EventSystem`], a registry of core event handlers with
//!   subscribe ([`EventSystem::on_core`]) and unsubscribe ([`EventSystem::off`])
//! - **Commands**: the [`RconCommands`] trait for `warn` and `kick`
//! - **Lifecycle**: [`SimplePlugin`] with `mount`/`unmount`, and the
//!   [`ServerContext`] handed to plugins
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use warden_event_system::*;
//!
//! # async fn example() -> Result<(), EventError> {
//! let events = create_warden_event_system();
//!
//! let id = events.on_core(TEAMKILL, |event: TeamkillEvent| {
//!     if let Some(attacker) = event.attacker_id() {
//!         tracing::info!("{} killed a teammate", attacker);
//!     }
//!     Ok(())
//! }).await?;
//!
//! events.emit_core(TEAMKILL, &TeamkillEvent::default()).await?;
//! events.off(id).await;
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod events;
pub mod plugin;
pub mod rcon;
pub mod shutdown;
pub mod system;
pub mod types;
pub mod utils;

pub use context::{BasicServerContext, LogLevel, ServerContext};
pub use events::{
    ChatMessageEvent, Event, EventError, EventHandler, Participant, TeamkillEvent,
    TypedEventHandler, CHAT_MESSAGE, TEAMKILL,
};
pub use plugin::{PluginError, SimplePlugin};
pub use rcon::{RconCommand, RconCommands, RconError};
pub use shutdown::ShutdownState;
pub use system::{EventSystem, EventSystemStats, HandlerId};
pub use types::SteamId;
pub use utils::{create_warden_event_system, current_timestamp};

pub use async_trait::async_trait;
pub use std::sync::Arc;
