//! Non-blocking command delivery, ordered per player.
//!
//! Every command is delivered by its own task. A player's task first waits for
//! that player's previous delivery, so one player's commands reach the RCON
//! channel in issue order, while a slow or hung call for one player never holds
//! up anybody else. Across players there is no ordering.
//!
//! [`CommandDispatcher::flush`] waits for everything already issued, so a host
//! shutting down does not lose commands that are still in flight.

use crate::reporter::CommandFailureReporter;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use warden_event_system::{RconCommand, RconCommands, RconError, SteamId};

/// Upper bound on a single RCON round trip before it is reported as failed.
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub(crate) struct CommandDispatcher {
    runtime: Handle,
    rcon: Arc<dyn RconCommands>,
    reporter: Arc<dyn CommandFailureReporter>,
    /// Latest delivery per player; each one awaits the delivery it replaced
    tails: Mutex<HashMap<SteamId, JoinHandle<()>>>,
}

impl CommandDispatcher {
    pub(crate) fn new(
        runtime: Handle,
        rcon: Arc<dyn RconCommands>,
        reporter: Arc<dyn CommandFailureReporter>,
    ) -> Self {
        Self {
            runtime,
            rcon,
            reporter,
            tails: Mutex::new(HashMap::new()),
        }
    }

    /// Queues a command behind the same player's earlier commands without
    /// waiting for delivery.
    pub(crate) fn issue(&self, command: RconCommand) {
        let mut tails = self.lock_tails();
        tails.retain(|_, delivery| !delivery.is_finished());

        let player = command.target().clone();
        let previous = tails.remove(&player);
        let rcon = Arc::clone(&self.rcon);
        let reporter = Arc::clone(&self.reporter);

        let delivery = self.runtime.spawn(async move {
            if let Some(previous) = previous {
                // A panicked predecessor must not stall the chain
                let _ = previous.await;
            }
            deliver(command, rcon.as_ref(), reporter.as_ref()).await;
        });
        tails.insert(player, delivery);
    }

    /// Waits until every command issued so far has been delivered or reported.
    ///
    /// Gives up after `limit`; deliveries still running are left to finish on
    /// their own and the players they belong to are logged.
    pub(crate) async fn flush(&self, limit: Duration) -> bool {
        let tails: Vec<(SteamId, JoinHandle<()>)> = self.lock_tails().drain().collect();
        if tails.is_empty() {
            return true;
        }

        debug!("📬 Waiting for {} player command queues", tails.len());
        let deadline = tokio::time::Instant::now() + limit;
        let mut undelivered = Vec::new();

        for (player, mut delivery) in tails {
            if tokio::time::timeout_at(deadline, &mut delivery).await.is_err() {
                undelivered.push(player);
            }
        }

        if undelivered.is_empty() {
            true
        } else {
            error!(
                "❌ Commands for {} players still undelivered after {:?}: {:?}",
                undelivered.len(),
                limit,
                undelivered
            );
            false
        }
    }

    fn lock_tails(&self) -> MutexGuard<'_, HashMap<SteamId, JoinHandle<()>>> {
        self.tails.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn deliver(command: RconCommand, rcon: &dyn RconCommands, reporter: &dyn CommandFailureReporter) {
    let result = match tokio::time::timeout(COMMAND_TIMEOUT, command.send(rcon)).await {
        Ok(result) => result,
        Err(_) => {
            warn!("⏳ RCON command for player {} timed out", command.target());
            Err(RconError::TimedOut(COMMAND_TIMEOUT))
        }
    };

    match result {
        Ok(()) => debug!("📨 Delivered {:?}", command),
        Err(e) => reporter.report(&command, &e),
    }
}
