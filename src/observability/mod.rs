//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, reload coordinator, probers
//!     → logging.rs (tracing events to stdout)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → GET /metrics (Prometheus scrape of the exporter itself)
//! ```
//!
//! # Design Decisions
//! - Probe results are answered inline per request; these metrics only
//!   describe the exporter's own health
//! - Metric updates are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
