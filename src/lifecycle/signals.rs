//! OS signal handling.
//!
//! - SIGHUP queues a fire-and-forget config reload
//! - SIGINT / SIGTERM trigger graceful shutdown

use tokio::sync::broadcast;

use crate::config::ReloadHandle;

/// Forward every SIGHUP to the reload coordinator until shutdown.
#[cfg(unix)]
pub async fn forward_hangups(reload: ReloadHandle, mut shutdown: broadcast::Receiver<()>) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangups = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!(error = %e, "Failed to install SIGHUP handler, signal reloads disabled");
            return;
        }
    };

    loop {
        tokio::select! {
            received = hangups.recv() => {
                if received.is_none() {
                    break;
                }
                tracing::info!("SIGHUP received, reloading config");
                reload.trigger();
            }
            _ = shutdown.recv() => break,
        }
    }
}

#[cfg(not(unix))]
pub async fn forward_hangups(_reload: ReloadHandle, mut shutdown: broadcast::Receiver<()>) {
    let _ = shutdown.recv().await;
}

/// Resolve on the first SIGINT (Ctrl+C) or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
