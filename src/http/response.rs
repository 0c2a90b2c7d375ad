//! Response mapping for request-scoped errors.
//!
//! # Design Decisions
//! - Every probe lookup failure is the requester's problem: 400 with the
//!   error text as a plaintext body
//! - Reload failures are reported as 500 by the reload handler itself

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::probe::ProbeError;

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "Rejecting probe request");
        (StatusCode::BAD_REQUEST, format!("{self}\n")).into_response()
    }
}
