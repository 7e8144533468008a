//! # Event Traits and Game Events
//!
//! This module defines the event infrastructure and the game events delivered
//! by the host. It includes the fundamental [`Event`] trait, the handler
//! abstractions, and the two events moderation plugins subscribe to.
//!
//! ## Game Events
//!
//! | name | payload | emitted when |
//! |------|---------|--------------|
//! | [`TEAMKILL`] | [`TeamkillEvent`] | a player killed a teammate |
//! | [`CHAT_MESSAGE`] | [`ChatMessageEvent`] | a player said something in any chat |
//!
//! Payloads keep the host's wire field names (`steamID`), so a JSON object
//! produced by the game server adapter deserializes directly. Participants and
//! identities may be missing; accessors such as [`TeamkillEvent::attacker_id`]
//! collapse every "unknown" shape into `None`.

use crate::types::SteamId;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{any::Any, fmt::Debug};

/// Core event name for teamkill notifications.
pub const TEAMKILL: &str = "TEAMKILL";

/// Core event name for chat notifications.
pub const CHAT_MESSAGE: &str = "CHAT_MESSAGE";

// ============================================================================
// Event Traits and Core Infrastructure
// ============================================================================

/// Core trait that all events must implement.
///
/// Most types get this through the blanket implementation below: anything
/// that is `Serialize + DeserializeOwned + Debug + Send + Sync + 'static` is an
/// event with JSON serialization.
pub trait Event: Send + Sync + Any + std::fmt::Debug {
    /// Returns the type name of this event for debugging and routing.
    fn type_name() -> &'static str
    where
        Self: Sized;

    /// Serializes the event to bytes for dispatch.
    fn serialize(&self) -> Result<Vec<u8>, EventError>;

    /// Deserializes an event from bytes.
    fn deserialize(data: &[u8]) -> Result<Self, EventError>
    where
        Self: Sized;
}

impl<T> Event for T
where
    T: Serialize + DeserializeOwned + Send + Sync + Any + std::fmt::Debug + 'static,
{
    fn type_name() -> &'static str {
        std::any::type_name::<T>()
    }

    fn serialize(&self) -> Result<Vec<u8>, EventError> {
        serde_json::to_vec(self).map_err(|e| {
            tracing::error!(
                "🔴 Event serialization failed for type '{}': {} (event debug: {:?})",
                Self::type_name(),
                e,
                self
            );
            EventError::Serialization(e)
        })
    }

    fn deserialize(data: &[u8]) -> Result<Self, EventError> {
        serde_json::from_slice(data).map_err(EventError::Deserialization)
    }
}

/// Handler trait for processing events from serialized data.
///
/// Most users will not implement this trait directly, but instead register a
/// closure through [`crate::EventSystem::on_core`], which wraps it in a
/// [`TypedEventHandler`].
#[async_trait]
pub trait EventHandler: Send + Sync + 'static + Debug {
    /// Handles an event from serialized data.
    async fn handle(&self, data: &[u8]) -> Result<(), EventError>;

    /// Returns a human-readable name for this handler for debugging.
    fn handler_name(&self) -> &str;
}

/// Type-safe wrapper for event handlers.
///
/// Bridges between the generic [`EventHandler`] trait and a specific event
/// type. A payload that does not decode as `T` is logged and skipped rather
/// than reported as a handler failure, so one malformed notification from the
/// host never surfaces as an error.
pub struct TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    handler: F,
    name: String,
    _phantom: std::marker::PhantomData<T>,
}

impl<T, F> Clone for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync + Clone,
{
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            name: self.name.clone(),
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<T, F> std::fmt::Debug for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedEventHandler")
            .field("name", &self.name)
            .finish()
    }
}

impl<T, F> TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync,
{
    /// Creates a new typed event handler.
    pub fn new(name: String, handler: F) -> Self {
        Self {
            handler,
            name,
            _phantom: std::marker::PhantomData,
        }
    }
}

#[async_trait]
impl<T, F> EventHandler for TypedEventHandler<T, F>
where
    T: Event,
    F: Fn(T) -> Result<(), EventError> + Send + Sync + Clone + 'static,
{
    async fn handle(&self, data: &[u8]) -> Result<(), EventError> {
        match T::deserialize(data) {
            Ok(event) => (self.handler)(event),
            Err(e) => {
                let data_preview = if data.len() > 100 {
                    format!(
                        "{}... ({} more bytes)",
                        String::from_utf8_lossy(&data[..100]),
                        data.len() - 100
                    )
                } else {
                    String::from_utf8_lossy(data).to_string()
                };

                tracing::warn!(
                    "🟡 EventHandler '{}' (expects type '{}'): payload skipped - {}. Data preview: '{}'",
                    self.name,
                    std::any::type_name::<T>(),
                    e,
                    data_preview
                );
                Ok(())
            }
        }
    }

    fn handler_name(&self) -> &str {
        &self.name
    }
}

// ============================================================================
// Game Events
// ============================================================================

/// One side of a teamkill as reported by the host.
///
/// Only the identity matters to moderation; the name is carried for logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Player identity; may be missing when the server could not resolve it
    #[serde(rename = "steamID", default, skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<SteamId>,
    /// In-game name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Participant {
    /// Creates a participant with a known identity.
    pub fn with_id(steam_id: impl Into<SteamId>) -> Self {
        Self {
            steam_id: Some(steam_id.into()),
            name: None,
        }
    }

    /// Returns the identity if one was reported and it is non-empty.
    pub fn id(&self) -> Option<&SteamId> {
        self.steam_id.as_ref().filter(|id| !id.is_empty())
    }
}

/// Event emitted when one player kills a teammate.
///
/// # Examples
///
/// ```rust
/// use warden_event_system::TeamkillEvent;
///
/// let event: TeamkillEvent = serde_json::from_str(
///     r#"{"attacker": {"steamID": "7656"}, "victim": null}"#,
/// ).unwrap();
/// assert_eq!(event.attacker_id().map(|id| id.as_str()), Some("7656"));
/// assert!(event.victim_id().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamkillEvent {
    /// The player who caused the death
    #[serde(default)]
    pub attacker: Option<Participant>,
    /// The teammate who died
    #[serde(default)]
    pub victim: Option<Participant>,
}

impl TeamkillEvent {
    /// Builds an event where both sides are identified.
    pub fn between(attacker: impl Into<SteamId>, victim: impl Into<SteamId>) -> Self {
        Self {
            attacker: Some(Participant::with_id(attacker)),
            victim: Some(Participant::with_id(victim)),
        }
    }

    /// Identity of the attacker, if the event carries one.
    pub fn attacker_id(&self) -> Option<&SteamId> {
        self.attacker.as_ref().and_then(Participant::id)
    }

    /// Identity of the victim, if the event carries one.
    pub fn victim_id(&self) -> Option<&SteamId> {
        self.victim.as_ref().and_then(Participant::id)
    }
}

/// Event emitted for every chat line, whatever the channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessageEvent {
    /// Identity of the speaker
    #[serde(rename = "steamID", default, skip_serializing_if = "Option::is_none")]
    pub steam_id: Option<SteamId>,
    /// Message text
    #[serde(default)]
    pub message: Option<String>,
    /// Chat channel (e.g. `ChatAll`, `ChatTeam`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat: Option<String>,
    /// Speaker name, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChatMessageEvent {
    /// Builds a chat event from a speaker and a message.
    pub fn said(steam_id: impl Into<SteamId>, message: impl Into<String>) -> Self {
        Self {
            steam_id: Some(steam_id.into()),
            message: Some(message.into()),
            chat: None,
            name: None,
        }
    }

    /// Identity of the speaker, if the event carries a non-empty one.
    pub fn speaker_id(&self) -> Option<&SteamId> {
        self.steam_id.as_ref().filter(|id| !id.is_empty())
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during event system operations.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// Serialization failed when converting event to bytes
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Deserialization failed when converting bytes to event
    #[error("Deserialization error: {0}")]
    Deserialization(serde_json::Error),
    /// Handler execution failed during event processing
    #[error("Handler execution error: {0}")]
    HandlerExecution(String),
}
