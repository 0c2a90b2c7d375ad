//! Live configuration snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::schema::Config;

/// Holds the active [`Config`] behind an atomically swapped pointer.
///
/// Readers take one `Arc<Config>` per request and keep it for the whole
/// check, so a concurrent [`replace`](Self::replace) never shows them a mix
/// of old and new modules. The store does not serialize writers; the reload
/// coordinator is the only caller of `replace`.
#[derive(Debug)]
pub struct ConfigStore {
    current: ArcSwap<Config>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    /// Snapshot of the active configuration.
    pub fn current(&self) -> Arc<Config> {
        self.current.load_full()
    }

    /// Atomically publish a new configuration.
    pub fn replace(&self, config: Config) {
        self.current.store(Arc::new(config));
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
