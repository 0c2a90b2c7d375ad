//! Exporter self-metrics.
//!
//! # Responsibilities
//! - Install the Prometheus recorder rendered at `/metrics`
//! - Track probe counts and latency per module
//! - Track configuration reload health
//!
//! # Metrics
//! - `sentry_exporter_build_info` (gauge): always 1, labelled with version
//! - `sentry_exporter_probes_total` (counter): probes by module, result
//! - `sentry_exporter_probe_duration_seconds` (histogram): probe latency
//! - `sentry_exporter_config_reloads_total` (counter): reloads by result
//! - `sentry_exporter_config_last_reload_successful` (gauge): 1=ok, 0=failed
//! - `sentry_exporter_config_last_reload_success_timestamp_seconds` (gauge)
//!
//! Without an installed recorder every call here is a no-op, so library
//! code and tests can record freely.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Unit};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

const PROBE_DURATION: &str = "sentry_exporter_probe_duration_seconds";

const PROBE_BUCKETS: &[f64] = &[0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0];

/// Install the global Prometheus recorder and return a handle for rendering.
pub fn install() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(PROBE_DURATION.to_string()), PROBE_BUCKETS)?
        .install_recorder()?;

    describe_gauge!("sentry_exporter_build_info", "Build information of the running exporter.");
    describe_counter!("sentry_exporter_probes_total", "Probes executed, by module and result.");
    describe_histogram!(PROBE_DURATION, Unit::Seconds, "Wall-clock duration of probes.");
    describe_counter!("sentry_exporter_config_reloads_total", "Configuration reload attempts.");
    describe_gauge!(
        "sentry_exporter_config_last_reload_successful",
        "Whether the last configuration reload attempt succeeded."
    );
    describe_gauge!(
        "sentry_exporter_config_last_reload_success_timestamp_seconds",
        Unit::Seconds,
        "Timestamp of the last successful configuration reload."
    );

    gauge!("sentry_exporter_build_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

    tracing::info!("Metrics recorder installed");
    Ok(handle)
}

/// Record one completed probe.
pub fn record_probe(module: &str, success: bool, elapsed: Duration) {
    let result = if success { "success" } else { "failure" };
    counter!("sentry_exporter_probes_total", "module" => module.to_string(), "result" => result)
        .increment(1);
    histogram!(PROBE_DURATION, "module" => module.to_string()).record(elapsed.as_secs_f64());
}

/// Record the outcome of a configuration load (startup or reload).
pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("sentry_exporter_config_reloads_total", "result" => result).increment(1);
    gauge!("sentry_exporter_config_last_reload_successful").set(if success { 1.0 } else { 0.0 });

    if success {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        gauge!("sentry_exporter_config_last_reload_success_timestamp_seconds").set(now);
    }
}
