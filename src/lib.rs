//! Sentry exporter library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod probe;

pub use config::{Config, ConfigStore};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use probe::{ProbeOutcome, Prober, ProberRegistry};
