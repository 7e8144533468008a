//! # Apology Tracker
//!
//! The state machine behind the rule. For every attacker it holds at most one
//! pending apology, and for each pending apology two timers: a reminder at
//! [`REMINDER_DELAY`] and a kick at [`KICK_DELAY`], both measured from the
//! moment the teamkill was received.
//!
//! ```text
//! NONE ──teamkill──▶ PENDING ──30s──▶ (reminded) ──60s──▶ kicked ─▶ NONE
//!                       │                  │
//!                       └────apology───────┴──────────────▶ thanked ─▶ NONE
//! ```
//!
//! ## Serialization
//!
//! Event handlers and timer bodies all go through one mutex around the
//! tracking map, and never hold it across an await. A timer that wakes up
//! re-checks, under that mutex, that the map still holds *the entry it was
//! scheduled for* (same generation) before acting. Cancelling an entry
//! removes it under the same mutex, so a timer whose sleep already finished
//! but whose body has not run yet still does nothing.
//!
//! Replacing an entry (second teamkill before the first one resolved) aborts
//! the old timers. Should one of them already be past its deadline, the
//! generation check makes it inert; it can never touch the new entry.

use crate::apology::ApologyMatcher;
use crate::dispatch::{CommandDispatcher, COMMAND_TIMEOUT};
use crate::error::TrackerError;
use crate::options::AutoTkWarnOptions;
use crate::reporter::{CommandFailureReporter, TracingFailureReporter};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use warden_event_system::{
    current_timestamp, ChatMessageEvent, EventSystem, HandlerId, RconCommand, RconCommands,
    SteamId, TeamkillEvent, CHAT_MESSAGE, TEAMKILL,
};

/// Time after a teamkill at which an unresolved attacker is reminded.
pub const REMINDER_DELAY: Duration = Duration::from_secs(30);

/// Time after a teamkill at which an unresolved attacker is kicked.
pub const KICK_DELAY: Duration = Duration::from_secs(60);

/// Reason shown to a kicked attacker.
pub const KICK_REASON: &str = "no apology after teamkill";

/// One attacker's open obligation to apologize.
#[derive(Debug)]
struct PendingApology {
    generation: u64,
    reminder: JoinHandle<()>,
    kick: JoinHandle<()>,
    /// Unix seconds, for logs only
    issued_at: u64,
}

impl PendingApology {
    fn cancel(&self) {
        self.reminder.abort();
        self.kick.abort();
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    pending: HashMap<SteamId, PendingApology>,
    next_generation: u64,
    stopped: bool,
}

impl TrackerState {
    fn allocate_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }

    /// True if `player`'s live entry is the one scheduled as `generation`.
    fn holds(&self, player: &SteamId, generation: u64) -> bool {
        self.pending
            .get(player)
            .is_some_and(|entry| entry.generation == generation)
    }
}

#[derive(Debug, Clone, Copy)]
struct Subscriptions {
    teamkill: HandlerId,
    chat: HandlerId,
}

#[derive(Debug)]
struct TrackerInner {
    options: AutoTkWarnOptions,
    matcher: ApologyMatcher,
    commands: CommandDispatcher,
    runtime: Handle,
    state: Mutex<TrackerState>,
    subscriptions: tokio::sync::Mutex<Option<Subscriptions>>,
}

/// Correlates teamkills and chat per player and escalates warn → remind → kick.
///
/// Cloning is cheap; clones share the same tracking map.
#[derive(Debug, Clone)]
pub struct ApologyTracker {
    inner: Arc<TrackerInner>,
}

impl ApologyTracker {
    /// Creates a tracker on the current tokio runtime, reporting failed
    /// commands through `tracing`.
    pub fn new(options: AutoTkWarnOptions, rcon: Arc<dyn RconCommands>) -> Result<Self, TrackerError> {
        Self::with_reporter(options, rcon, Arc::new(TracingFailureReporter))
    }

    /// Creates a tracker on the current tokio runtime with a custom failure
    /// reporter.
    pub fn with_reporter(
        options: AutoTkWarnOptions,
        rcon: Arc<dyn RconCommands>,
        reporter: Arc<dyn CommandFailureReporter>,
    ) -> Result<Self, TrackerError> {
        let runtime = Handle::try_current()?;
        let matcher = ApologyMatcher::new(&options.apology_keywords);
        let commands = CommandDispatcher::new(runtime.clone(), rcon, reporter);

        Ok(Self {
            inner: Arc::new(TrackerInner {
                options,
                matcher,
                commands,
                runtime,
                state: Mutex::new(TrackerState::default()),
                subscriptions: tokio::sync::Mutex::new(None),
            }),
        })
    }

    /// Subscribes the tracker to teamkill and chat events.
    pub async fn start(&self, events: &EventSystem) -> Result<(), TrackerError> {
        let mut subscriptions = self.inner.subscriptions.lock().await;
        if subscriptions.is_some() {
            return Err(TrackerError::AlreadyStarted);
        }

        self.inner.lock_state().stopped = false;

        let tracker = self.clone();
        let teamkill = events
            .on_core(TEAMKILL, move |event: TeamkillEvent| {
                tracker.handle_teamkill(&event);
                Ok(())
            })
            .await?;

        let tracker = self.clone();
        let chat = match events
            .on_core(CHAT_MESSAGE, move |event: ChatMessageEvent| {
                tracker.handle_chat_message(&event);
                Ok(())
            })
            .await
        {
            Ok(id) => id,
            Err(e) => {
                events.off(teamkill).await;
                return Err(e.into());
            }
        };

        *subscriptions = Some(Subscriptions { teamkill, chat });
        info!("🛡️ Apology tracker listening for {} and {}", TEAMKILL, CHAT_MESSAGE);
        Ok(())
    }

    /// Unsubscribes the tracker and cancels every pending apology.
    ///
    /// Commands already issued are still delivered: this waits for them, up
    /// to [`COMMAND_TIMEOUT`]. Returns the number of pending apologies that
    /// were cancelled. Events still in flight when this returns are ignored.
    pub async fn stop(&self, events: &EventSystem) -> Result<usize, TrackerError> {
        let mut subscriptions = self.inner.subscriptions.lock().await;
        let Subscriptions { teamkill, chat } = subscriptions.take().ok_or(TrackerError::NotStarted)?;

        events.off(teamkill).await;
        events.off(chat).await;

        // Nothing issues commands once every entry is gone and `stopped` is set
        let cancelled = self.inner.cancel_all();
        self.inner.commands.flush(COMMAND_TIMEOUT).await;
        info!("🛡️ Apology tracker stopped, {} pending apologies cancelled", cancelled);
        Ok(cancelled)
    }

    /// Warns the attacker, opens a pending apology and notifies the victim.
    ///
    /// Missing participants or identities are skipped side by side: an event
    /// with no identifiable attacker can still notify its victim.
    pub fn handle_teamkill(&self, event: &TeamkillEvent) {
        let received_at = Instant::now();
        let inner = &self.inner;
        debug!("🔫 Teamkill event detected: {:?}", event);

        let mut state = inner.lock_state();
        if state.stopped {
            debug!("🔇 Ignoring teamkill, tracker is stopped");
            return;
        }

        if let (Some(attacker), Some(message)) = (event.attacker_id(), inner.options.attacker_message()) {
            inner.commands.issue(RconCommand::warn(attacker.clone(), message));

            let generation = state.allocate_generation();
            let reminder = inner.runtime.spawn(Arc::clone(inner).remind_at(
                attacker.clone(),
                generation,
                received_at + REMINDER_DELAY,
            ));
            let kick = inner.runtime.spawn(Arc::clone(inner).kick_at(
                attacker.clone(),
                generation,
                received_at + KICK_DELAY,
            ));

            let entry = PendingApology {
                generation,
                reminder,
                kick,
                issued_at: current_timestamp(),
            };

            match state.pending.insert(attacker.clone(), entry) {
                Some(previous) => {
                    previous.cancel();
                    info!(
                        "🔁 Player {} teamkilled again, apology clock restarted (previous issued at {})",
                        attacker, previous.issued_at
                    );
                }
                None => info!("⏳ Pending apology for player {} set", attacker),
            }
        }

        if let (Some(victim), Some(message)) = (event.victim_id(), inner.options.victim_message()) {
            inner.commands.issue(RconCommand::warn(victim.clone(), message));
        }
    }

    /// Accepts an apology from a player with a pending obligation.
    pub fn handle_chat_message(&self, event: &ChatMessageEvent) {
        let (Some(speaker), Some(message)) = (event.speaker_id(), event.message.as_deref()) else {
            return;
        };
        if !self.inner.matcher.is_apology(message) {
            return;
        }

        let inner = &self.inner;
        let mut state = inner.lock_state();
        if state.stopped {
            return;
        }

        let Some(entry) = state.pending.remove(speaker) else {
            debug!("💬 Player {} apologized with nothing pending", speaker);
            return;
        };
        entry.cancel();

        inner.commands.issue(RconCommand::warn(speaker.clone(), inner.options.thank_you_message.as_str()));
        info!(
            "🙏 Player {} apologized {}s after the warning and was not kicked",
            speaker,
            current_timestamp().saturating_sub(entry.issued_at)
        );
    }

    /// Number of attackers currently expected to apologize.
    pub fn pending_count(&self) -> usize {
        self.inner.lock_state().pending.len()
    }

    pub fn is_pending(&self, player: &SteamId) -> bool {
        self.inner.lock_state().pending.contains_key(player)
    }

    /// Whether the tracker is currently subscribed to events.
    pub async fn is_started(&self) -> bool {
        self.inner.subscriptions.lock().await.is_some()
    }
}

impl TrackerInner {
    fn lock_state(&self) -> MutexGuard<'_, TrackerState> {
        // State stays consistent even if a holder panicked: every mutation is a single map operation
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn remind_at(self: Arc<Self>, player: SteamId, generation: u64, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
        self.fire_reminder(&player, generation);
    }

    async fn kick_at(self: Arc<Self>, player: SteamId, generation: u64, deadline: Instant) {
        tokio::time::sleep_until(deadline).await;
        self.fire_kick(&player, generation);
    }

    /// Reminder body. Leaves the entry in place.
    fn fire_reminder(&self, player: &SteamId, generation: u64) -> bool {
        let state = self.lock_state();
        if !state.holds(player, generation) {
            debug!("⌛ Stale reminder for player {} (generation {})", player, generation);
            return false;
        }

        self.commands.issue(RconCommand::warn(player.clone(), self.options.reminder_message.as_str()));
        info!("⏰ Reminder sent to player {} to apologize", player);
        true
    }

    /// Kick body. Removes the entry before the kick is issued.
    fn fire_kick(&self, player: &SteamId, generation: u64) -> bool {
        let mut state = self.lock_state();
        if !state.holds(player, generation) {
            debug!("⌛ Stale kick for player {} (generation {})", player, generation);
            return false;
        }

        if let Some(entry) = state.pending.remove(player) {
            entry.reminder.abort();
        }

        self.commands.issue(RconCommand::kick(player.clone(), KICK_REASON));
        info!("👢 Player {} was kicked for not apologizing", player);
        true
    }

    fn cancel_all(&self) -> usize {
        let mut state = self.lock_state();
        state.stopped = true;
        let cancelled = state.pending.len();
        for (_, entry) in state.pending.drain() {
            entry.cancel();
        }
        cancelled
    }
}
