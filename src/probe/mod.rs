//! Probing subsystem.
//!
//! # Data Flow
//! ```text
//! GET /probe?target=..&module=..
//!     → snapshot of Config (config::store)
//!     → Module by name
//!     → registry.rs resolves module.prober → Arc<dyn Prober>
//!     → Prober::check(target, module) → ProbeOutcome
//!     → ProbeOutcome::render → plaintext metric lines
//! ```
//!
//! # Design Decisions
//! - The registry is built once at startup and never mutated
//! - Probers never fail: transport and parsing problems become a failed
//!   or zero-valued outcome
//! - Each request runs exactly one fresh check; nothing is cached

pub mod extract;
pub mod http;
pub mod registry;

use std::fmt::Write as _;
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::config::Module;

pub use self::http::HttpProber;
pub use self::registry::ProberRegistry;

/// Module used when a request does not name one.
pub const DEFAULT_MODULE: &str = "sentry";

/// A check strategy: performs one check of a target.
pub trait Prober: Send + Sync {
    /// Name under which the prober is registered.
    fn name(&self) -> &'static str;

    /// Run one check of `target` using `module`'s settings and timeout.
    fn check<'a>(&'a self, target: &'a str, module: &'a Module) -> BoxFuture<'a, ProbeOutcome>;
}

/// Result of a single check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeOutcome {
    pub success: bool,
    /// 0 when no response was obtained.
    pub status_code: u16,
    /// -1 when the response did not declare a length, 0 without a response.
    pub content_length: i64,
    /// Counter parsed from the body. Only present for successful checks.
    pub error_received: Option<i64>,
    /// Wall-clock time of the check, filled in by the caller.
    pub duration: Duration,
}

impl ProbeOutcome {
    /// Outcome for a check that got no response at all.
    pub fn no_response() -> Self {
        Self::default()
    }

    /// Render as plaintext metric lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(count) = self.error_received {
            let _ = writeln!(out, "probe_sentry_error_received {count}");
        }
        let _ = writeln!(out, "probe_sentry_status_code {}", self.status_code);
        let _ = writeln!(out, "probe_sentry_content_length {}", self.content_length);
        let _ = writeln!(out, "probe_duration_seconds {:.6}", self.duration.as_secs_f64());
        let _ = writeln!(out, "probe_success {}", u8::from(self.success));
        out
    }
}

/// Request-scoped probe errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Target parameter is missing")]
    MissingTarget,

    #[error("Unknown module {0:?}")]
    UnknownModule(String),

    #[error("Unknown prober {0:?}")]
    UnknownProber(String),
}
