//! Startup orchestration.
//!
//! # Responsibilities
//! - Parse command-line options
//! - Load the configuration (fatal on failure)
//! - Start the reload coordinator, signal listeners and optional watcher
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Background tasks subscribe to shutdown before the server starts

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::reload::DEFAULT_RELOAD_TIMEOUT;
use crate::config::watcher::ConfigWatcher;
use crate::config::{load_config, ConfigError, ConfigStore, ReloadCoordinator};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::probe::ProberRegistry;

/// Command-line options of the exporter binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "sentry-exporter", version, about = "Probe Sentry project stats and expose them as metrics")]
pub struct Options {
    /// Exporter configuration file.
    #[arg(long = "config.file", default_value = "sentry_exporter.toml")]
    pub config_file: PathBuf,

    /// Address to listen on for HTTP requests.
    #[arg(long = "web.listen-address", default_value = "0.0.0.0:9412")]
    pub listen_address: String,

    /// Upper bound on reading and parsing the config during a reload.
    #[arg(long = "config.reload-timeout", default_value = "30s", value_parser = humantime::parse_duration)]
    pub reload_timeout: Duration,

    /// Reload automatically when the config file changes.
    #[arg(long = "config.watch")]
    pub watch_config: bool,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long = "log.level", default_value = "info")]
    pub log_level: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config_file: PathBuf::from("sentry_exporter.toml"),
            listen_address: "0.0.0.0:9412".to_string(),
            reload_timeout: DEFAULT_RELOAD_TIMEOUT,
            watch_config: false,
            log_level: "info".to_string(),
        }
    }
}

/// Fatal startup and serving errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("error loading config: {0}")]
    Config(#[from] ConfigError),

    #[error("error building HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("error installing metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("error watching config file: {0}")]
    Watch(#[from] notify::Error),

    #[error("error binding {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("error serving HTTP: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the exporter until a shutdown signal arrives.
pub async fn run(options: Options) -> Result<(), StartupError> {
    let metrics_handle = metrics::install()?;

    let config = load_config(&options.config_file)?;
    tracing::info!(path = ?options.config_file, modules = config.modules.len(), "Loaded config file");
    metrics::record_reload(true);

    let store = Arc::new(ConfigStore::new(config));
    let registry = Arc::new(ProberRegistry::with_defaults()?);
    tracing::debug!(probers = ?registry.names(), "Prober registry ready");

    let shutdown = Shutdown::new();

    let (coordinator, reload) =
        ReloadCoordinator::new(options.config_file.clone(), store.clone(), options.reload_timeout);
    tokio::spawn(coordinator.run(shutdown.subscribe()));
    tokio::spawn(signals::forward_hangups(reload.clone(), shutdown.subscribe()));

    let _watcher = if options.watch_config {
        Some(ConfigWatcher::new(&options.config_file, reload.clone()).run()?)
    } else {
        None
    };

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            signals::shutdown_signal().await;
            shutdown.trigger();
        });
    }

    let listener = TcpListener::bind(&options.listen_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: options.listen_address.clone(),
            source,
        })?;
    tracing::info!(address = %options.listen_address, "Listening on");

    let state = AppState {
        store,
        registry,
        reload,
        metrics: Some(metrics_handle),
    };
    HttpServer::new(state)
        .run(listener, shutdown)
        .await
        .map_err(StartupError::Serve)
}
