//! Signal handling for graceful shutdown.
//!
//! The first SIGINT/SIGTERM (Ctrl+C on Windows) starts a graceful shutdown:
//! the input bridge stops and the plugin is unmounted. The host then listens
//! again so that a second signal exits immediately.

use tokio::signal;
use tracing::info;
use warden_event_system::ShutdownState;

/// Waits for a termination signal and marks `shutdown_state` as initiated.
pub async fn setup_signal_handlers(shutdown_state: &ShutdownState) -> std::io::Result<()> {
    wait_for_signal().await?;
    info!("📡 Received shutdown signal - initiating graceful shutdown");
    shutdown_state.initiate_shutdown();
    Ok(())
}

/// Waits for a termination signal without logging or touching any state.
pub async fn wait_for_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => (),
            _ = sigterm.recv() => ()
        }
    }

    #[cfg(windows)]
    signal::ctrl_c().await?;

    Ok(())
}
