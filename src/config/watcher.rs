//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config as WatchConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::reload::ReloadHandle;

/// Watches the configuration file and queues a reload on every change.
///
/// The watcher never loads the file itself; it funnels into the same
/// coordinator as SIGHUP so reloads stay serialized.
pub struct ConfigWatcher {
    path: PathBuf,
    reload: ReloadHandle,
}

impl ConfigWatcher {
    pub fn new(path: &Path, reload: ReloadHandle) -> Self {
        Self {
            path: path.to_path_buf(),
            reload,
        }
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for as long as changes
    /// should be picked up.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let reload = self.reload.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    tracing::info!("Config file change detected, reloading...");
                    reload.trigger();
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = %e, "Config watch error"),
            },
            WatchConfig::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
