//! Error types for the apology tracker.

use thiserror::Error;
use warden_event_system::EventError;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Apology tracker is already started")]
    AlreadyStarted,

    #[error("Apology tracker is not started")]
    NotStarted,

    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),

    #[error("Event subscription failed: {0}")]
    Subscription(#[from] EventError),
}
