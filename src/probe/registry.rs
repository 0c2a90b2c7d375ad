//! Prober lookup by name.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::probe::{HttpProber, ProbeError, Prober};

/// Immutable mapping from prober name to implementation.
///
/// Built once at startup and shared behind an `Arc`; adding a check kind
/// means registering it here, nothing else changes.
#[derive(Clone, Default)]
pub struct ProberRegistry {
    probers: HashMap<String, Arc<dyn Prober>>,
}

impl ProberRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in prober.
    pub fn with_defaults() -> Result<Self, reqwest::Error> {
        let mut registry = Self::new();
        registry.register(HttpProber::new()?);
        Ok(registry)
    }

    /// Add `prober` under its own name, replacing any previous entry.
    pub fn register<P: Prober + 'static>(&mut self, prober: P) {
        self.probers.insert(prober.name().to_string(), Arc::new(prober));
    }

    /// Find the prober registered as `name`.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn Prober>, ProbeError> {
        self.probers
            .get(name)
            .cloned()
            .ok_or_else(|| ProbeError::UnknownProber(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.probers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ProberRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProberRegistry").field("probers", &self.names()).finish()
    }
}
