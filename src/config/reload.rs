//! Serialized configuration reloads.
//!
//! # Responsibilities
//! - Accept reload requests from SIGHUP, the file watcher and `POST /-/reload`
//! - Run exactly one load + swap at a time, in arrival order
//! - Report the result to callers that wait for it
//!
//! # Design Decisions
//! - One consumer task owns the write side of the [`ConfigStore`]
//! - Fire-and-forget requests only log failures
//! - Awaited requests carry a oneshot sender for the result
//! - A failed or timed out reload leaves the previous snapshot active

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time;

use crate::config::loader::{load_config, ConfigError};
use crate::config::store::ConfigStore;
use crate::observability::metrics;

/// Default bound on a single load + parse.
pub const DEFAULT_RELOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a reload did not take effect.
#[derive(Debug, Error)]
pub enum ReloadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("reading config timed out after {0:?}")]
    TimedOut(Duration),

    #[error("config loader task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("reload coordinator is not running")]
    Unavailable,
}

/// A request queued for the coordinator.
#[derive(Debug)]
pub enum ReloadRequest {
    /// Reload and log the result.
    Trigger,
    /// Reload and send the result back.
    Await(oneshot::Sender<Result<(), ReloadError>>),
}

/// Cheap, cloneable entry point for submitting reloads.
#[derive(Debug, Clone)]
pub struct ReloadHandle {
    tx: mpsc::UnboundedSender<ReloadRequest>,
}

impl ReloadHandle {
    /// Queue a reload without waiting for it. Callable from non-async
    /// contexts such as the file watcher callback.
    pub fn trigger(&self) {
        if self.tx.send(ReloadRequest::Trigger).is_err() {
            tracing::warn!("Reload requested but the coordinator has stopped");
        }
    }

    /// Queue a reload and wait until it has been applied or rejected.
    pub async fn reload(&self) -> Result<(), ReloadError> {
        let (reply, result) = oneshot::channel();
        self.tx
            .send(ReloadRequest::Await(reply))
            .map_err(|_| ReloadError::Unavailable)?;
        result.await.map_err(|_| ReloadError::Unavailable)?
    }
}

/// Single consumer applying reloads to the [`ConfigStore`].
pub struct ReloadCoordinator {
    path: PathBuf,
    store: Arc<ConfigStore>,
    timeout: Duration,
    requests: mpsc::UnboundedReceiver<ReloadRequest>,
}

impl ReloadCoordinator {
    /// Create a coordinator for `path` and the handle that feeds it.
    pub fn new(path: impl Into<PathBuf>, store: Arc<ConfigStore>, timeout: Duration) -> (Self, ReloadHandle) {
        let (tx, requests) = mpsc::unbounded_channel();
        let coordinator = Self {
            path: path.into(),
            store,
            timeout,
            requests,
        };
        (coordinator, ReloadHandle { tx })
    }

    /// Process requests until every handle is dropped or shutdown fires.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::debug!(path = ?self.path, "Reload coordinator started");

        loop {
            tokio::select! {
                request = self.requests.recv() => {
                    let Some(request) = request else { break };
                    let result = self.reload_once().await;
                    if let Err(e) = &result {
                        tracing::error!(error = %e, "Error reloading config");
                    }
                    if let ReloadRequest::Await(reply) = request {
                        let _ = reply.send(result);
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Reload coordinator received shutdown signal");
                    break;
                }
            }
        }
    }

    async fn reload_once(&self) -> Result<(), ReloadError> {
        let path = self.path.clone();
        let load = tokio::task::spawn_blocking(move || load_config(&path));

        let result = match time::timeout(self.timeout, load).await {
            Ok(joined) => joined.map_err(ReloadError::from).and_then(|r| r.map_err(ReloadError::from)),
            Err(_) => Err(ReloadError::TimedOut(self.timeout)),
        };

        match result {
            Ok(config) => {
                let modules = config.modules.len();
                self.store.replace(config);
                metrics::record_reload(true);
                tracing::info!(path = ?self.path, modules, "Loaded config file");
                Ok(())
            }
            Err(e) => {
                metrics::record_reload(false);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;

    const VALID_A: &str = "[modules.a]\nprober = \"http\"\n";
    const VALID_B: &str = "[modules.b]\nprober = \"http\"\n";
    const INVALID: &str = "[modules.broken\n";

    fn spawn_coordinator(file: &tempfile::NamedTempFile) -> (Arc<ConfigStore>, ReloadHandle, Shutdown) {
        let store = Arc::new(ConfigStore::default());
        let shutdown = Shutdown::new();
        let (coordinator, handle) = ReloadCoordinator::new(file.path(), store.clone(), DEFAULT_RELOAD_TIMEOUT);
        tokio::spawn(coordinator.run(shutdown.subscribe()));
        (store, handle, shutdown)
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_good_config() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (store, handle, _shutdown) = spawn_coordinator(&file);

        std::fs::write(file.path(), VALID_A).unwrap();
        handle.reload().await.unwrap();
        assert!(store.current().module("a").is_some());

        std::fs::write(file.path(), INVALID).unwrap();
        let err = handle.reload().await.unwrap_err();
        assert!(matches!(err, ReloadError::Config(ConfigError::Parse { .. })));

        let current = store.current();
        assert!(current.module("a").is_some());
        assert_eq!(current.modules.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_reports_io_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (store, handle, _shutdown) = spawn_coordinator(&file);
        std::fs::remove_file(file.path()).unwrap();

        let err = handle.reload().await.unwrap_err();
        assert!(matches!(err, ReloadError::Config(ConfigError::Io { .. })));
        assert!(store.current().modules.is_empty());
    }

    #[tokio::test]
    async fn test_trigger_applies_without_reply() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), VALID_B).unwrap();
        let (store, handle, _shutdown) = spawn_coordinator(&file);

        handle.trigger();
        // Requests are processed in order, so an awaited reload queued
        // afterwards completes only once the trigger has been handled.
        handle.reload().await.unwrap();

        assert!(store.current().module("b").is_some());
    }

    #[tokio::test]
    async fn test_concurrent_reloads_all_complete() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), VALID_A).unwrap();
        let (store, handle, _shutdown) = spawn_coordinator(&file);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move { handle.reload().await }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert!(store.current().module("a").is_some());
    }

    #[tokio::test]
    async fn test_reload_after_shutdown_is_unavailable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let (_store, handle, shutdown) = spawn_coordinator(&file);

        shutdown.trigger();
        // Give the coordinator a chance to observe the signal and exit.
        for _ in 0..50 {
            if handle.tx.is_closed() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert!(matches!(handle.reload().await, Err(ReloadError::Unavailable)));
    }
}
