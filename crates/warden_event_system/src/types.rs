//! # Core Types
//!
//! Identity types shared by events, commands and plugins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque player identity as reported by the game server.
///
/// The server identifies players by their 64-bit Steam ID, delivered as a
/// decimal string. The value is never parsed; it is only compared, hashed and
/// passed back to the RCON channel verbatim.
///
/// # Examples
///
/// ```rust
/// use warden_event_system::SteamId;
///
/// let id = SteamId::new("76561198000000001");
/// assert_eq!(id.as_str(), "76561198000000001");
/// assert!(!id.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    /// Wraps a raw identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as it was received.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty identity is treated the same as a missing one.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SteamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SteamId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
