//! # Console Bridge
//!
//! Connects the host to a game server adapter over two line-oriented streams.
//!
//! **Events in.** Each input line is one JSON object naming a core event and
//! carrying its payload, which is emitted on the [`EventSystem`] untouched:
//!
//! ```json
//! {"event":"TEAMKILL","data":{"attacker":{"steamID":"7656"},"victim":{"steamID":"7657"}}}
//! {"event":"CHAT_MESSAGE","data":{"steamID":"7656","message":"sorry!","chat":"ChatAll"}}
//! ```
//!
//! **Commands out.** [`JsonLinesRcon`] writes every RCON command as one JSON
//! line, in the serialized form of [`RconCommand`]:
//!
//! ```json
//! {"command":"warn","steamID":"7656","message":"Please apologise for ALL TKs in ALL chat!"}
//! {"command":"kick","steamID":"7656","reason":"no apology after teamkill"}
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use warden_event_system::{
    EventError, EventSystem, RconCommand, RconCommands, RconError, ShutdownState, SteamId,
};

/// One input line: a core event name and its payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLine {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Malformed event line: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Event line has no event name")]
    MissingName,

    #[error("Event dispatch failed: {0}")]
    Dispatch(#[from] EventError),
}

/// Counters for one run of [`pump_events`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    /// Lines emitted as events
    pub dispatched: u64,
    /// Lines dropped because they could not be decoded
    pub skipped: u64,
}

impl EventLine {
    /// Decodes one input line. Blank lines decode to `None`.
    pub fn decode(line: &str) -> Result<Option<Self>, BridgeError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let decoded: EventLine = serde_json::from_str(line)?;
        if decoded.event.trim().is_empty() {
            return Err(BridgeError::MissingName);
        }
        Ok(Some(decoded))
    }

    /// Emits the payload as core event `self.event`.
    pub async fn dispatch(&self, events: &EventSystem) -> Result<(), BridgeError> {
        debug!("📥 Dispatching {} from input", self.event);
        events.emit_core(self.event.trim(), &self.data).await?;
        Ok(())
    }
}

/// Feeds every line of `reader` into `events` until EOF or shutdown.
///
/// Undecodable lines are logged and skipped; only a read error ends the pump
/// early.
pub async fn pump_events<R>(
    reader: R,
    events: &EventSystem,
    shutdown: &ShutdownState,
) -> std::io::Result<BridgeStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = BridgeStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if shutdown.is_shutdown_initiated() {
            debug!("🛑 Shutdown initiated, input no longer read");
            break;
        }

        let decoded = match EventLine::decode(&line) {
            Ok(Some(decoded)) => decoded,
            Ok(None) => continue,
            Err(e) => {
                warn!("⚠️ Skipping input line: {} ({})", e, line);
                stats.skipped += 1;
                continue;
            }
        };

        match decoded.dispatch(events).await {
            Ok(()) => stats.dispatched += 1,
            Err(e) => {
                warn!("⚠️ Could not dispatch {}: {}", decoded.event, e);
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// RCON channel that writes commands as JSON lines to `W`.
///
/// Each line is flushed as soon as it is written, so a consumer on the other
/// end of a pipe sees commands in real time.
pub struct JsonLinesRcon<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesRcon<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    async fn write_command(&self, command: &RconCommand) -> Result<(), RconError> {
        let mut line = serde_json::to_vec(command).map_err(std::io::Error::from)?;
        line.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}

impl<W> fmt::Debug for JsonLinesRcon<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonLinesRcon").finish_non_exhaustive()
    }
}

#[async_trait]
impl<W> RconCommands for JsonLinesRcon<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn warn(&self, steam_id: &SteamId, message: &str) -> Result<(), RconError> {
        self.write_command(&RconCommand::warn(steam_id.clone(), message)).await
    }

    async fn kick(&self, steam_id: &SteamId, reason: &str) -> Result<(), RconError> {
        self.write_command(&RconCommand::kick(steam_id.clone(), reason)).await
    }
}
