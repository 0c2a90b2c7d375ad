//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (read & deserialize into schema.rs types)
//!     → store.rs (Arc<Config> published via ArcSwap)
//!     → one snapshot read per probe request
//!
//! On reload (SIGHUP, POST /-/reload, watcher.rs):
//!     → reload.rs queues the request
//!     → single coordinator task: loader.rs → store.rs swap
//!     → awaiting callers receive Ok / error
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Loading checks syntax only; prober names are resolved per request
//! - The coordinator is the only writer, so the store needs no write lock

pub mod loader;
pub mod reload;
pub mod schema;
pub mod store;
pub mod watcher;

pub use loader::{load_config, ConfigError};
pub use reload::{ReloadCoordinator, ReloadError, ReloadHandle};
pub use schema::{Config, HttpProbeConfig, Module};
pub use store::ConfigStore;
