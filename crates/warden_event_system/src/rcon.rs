//! # Remote Control Commands
//!
//! The moderation surface of the game server's remote-control channel.
//! Plugins only ever see [`RconCommands`]; how a command reaches the server
//! (a Source RCON socket, a JSON-lines pipe, a test double) is the host's
//! business.

use crate::types::SteamId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Moderation commands accepted by the game server.
#[async_trait]
pub trait RconCommands: Send + Sync + Debug {
    /// Shows `message` to a single player.
    async fn warn(&self, steam_id: &SteamId, message: &str) -> Result<(), RconError>;

    /// Removes a player from the server, showing them `reason`.
    async fn kick(&self, steam_id: &SteamId, reason: &str) -> Result<(), RconError>;
}

/// A command captured as data, for dispatching it later or recording it.
///
/// The serialized form is the one the console bridge writes:
///
/// ```json
/// {"command":"warn","steamID":"76561198000000001","message":"Please apologise"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum RconCommand {
    Warn {
        #[serde(rename = "steamID")]
        steam_id: SteamId,
        message: String,
    },
    Kick {
        #[serde(rename = "steamID")]
        steam_id: SteamId,
        reason: String,
    },
}

impl RconCommand {
    pub fn warn(steam_id: SteamId, message: impl Into<String>) -> Self {
        Self::Warn { steam_id, message: message.into() }
    }

    pub fn kick(steam_id: SteamId, reason: impl Into<String>) -> Self {
        Self::Kick { steam_id, reason: reason.into() }
    }

    /// The player this command targets.
    pub fn target(&self) -> &SteamId {
        match self {
            Self::Warn { steam_id, .. } | Self::Kick { steam_id, .. } => steam_id,
        }
    }

    /// Sends this command through `rcon`.
    pub async fn send(&self, rcon: &dyn RconCommands) -> Result<(), RconError> {
        match self {
            Self::Warn { steam_id, message } => rcon.warn(steam_id, message).await,
            Self::Kick { steam_id, reason } => rcon.kick(steam_id, reason).await,
        }
    }
}

/// Errors reported by a remote-control channel.
#[derive(Debug, thiserror::Error)]
pub enum RconError {
    /// The command could not be delivered
    #[error("RCON transport error: {0}")]
    Transport(#[from] std::io::Error),
    /// The server answered but refused the command
    #[error("RCON command rejected: {0}")]
    Rejected(String),
    /// No answer arrived in time
    #[error("RCON command timed out after {0:?}")]
    TimedOut(std::time::Duration),
    /// The channel has been shut down
    #[error("RCON channel closed")]
    Closed,
}
