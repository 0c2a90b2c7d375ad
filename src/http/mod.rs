//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace layer)
//!     → handlers.rs
//!         /probe      → probe subsystem → plaintext metric lines
//!         /-/reload   → config reload coordinator
//!         /metrics    → exporter self-metrics
//!         /           → static index page
//!     → response.rs (probe errors → 400)
//! ```

pub mod handlers;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
