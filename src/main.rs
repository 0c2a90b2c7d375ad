//! sentry_exporter
//!
//! Probes Sentry project stats endpoints on demand and answers with
//! plaintext metric lines for a Prometheus-style scraper.
//!
//! # Architecture Overview
//!
//! ```text
//! GET /probe?target=..&module=..
//!     → http handler
//!     → ConfigStore snapshot (ArcSwap)
//!     → ProberRegistry → HttpProber
//!     → GET {prefix}{target}/stats/ ──────▶ Sentry
//!     ◀ plaintext metric lines
//!
//! SIGHUP / POST /-/reload / file watcher
//!     → reload coordinator task (one reload at a time)
//!     → load + parse config → ConfigStore swap
//! ```

use std::process::ExitCode;

use clap::Parser;

use sentry_exporter::lifecycle::startup::{self, Options};
use sentry_exporter::observability::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let options = Options::parse();
    logging::init(&options.log_level);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting sentry_exporter");

    if let Err(e) = startup::run(options).await {
        tracing::error!(error = %e, "sentry_exporter failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
