//! Request handlers.

use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::probe::{ProbeError, DEFAULT_MODULE};

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

const INDEX_PAGE: &str = r#"<html>
<head><title>Sentry Exporter</title></head>
<body>
<h1>Sentry Exporter</h1>
<p><a href="/probe?target=apimutate">Probe sentry project</a></p>
<p><a href="/metrics">Metrics</a></p>
</body>
</html>
"#;

/// Query string of `/probe`.
#[derive(Debug, Default, Deserialize)]
pub struct ProbeParams {
    pub target: Option<String>,
    pub module: Option<String>,
}

/// `GET /probe`: run one check and answer with its metric lines.
pub async fn probe(
    State(state): State<AppState>,
    Query(params): Query<ProbeParams>,
) -> Result<Response, ProbeError> {
    let target = params
        .target
        .filter(|t| !t.is_empty())
        .ok_or(ProbeError::MissingTarget)?;
    let module_name = params
        .module
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MODULE.to_string());

    // One snapshot for the whole request; a reload mid-check is not seen.
    let config = state.store.current();
    let module = config
        .module(&module_name)
        .ok_or_else(|| ProbeError::UnknownModule(module_name.clone()))?;
    let prober = state.registry.resolve(&module.prober)?;

    let start = Instant::now();
    let mut outcome = prober.check(&target, module).await;
    outcome.duration = start.elapsed();

    metrics::record_probe(&module_name, outcome.success, outcome.duration);
    tracing::debug!(
        module = %module_name,
        probe_target = %target,
        success = outcome.success,
        status_code = outcome.status_code,
        duration_s = outcome.duration.as_secs_f64(),
        "Probe finished"
    );

    Ok(([(header::CONTENT_TYPE, TEXT_PLAIN)], outcome.render()).into_response())
}

/// `/-/reload`: reload the configuration and wait for the result.
pub async fn reload(State(state): State<AppState>, method: Method) -> Response {
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            "This endpoint requires a POST request.\n",
        )
            .into_response();
    }

    match state.reload.reload().await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to reload config: {e}\n"),
        )
            .into_response(),
    }
}

/// `GET /metrics`: the exporter's own metrics.
pub async fn exporter_metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => ([(header::CONTENT_TYPE, TEXT_PLAIN)], handle.render()).into_response(),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed\n").into_response(),
    }
}

/// `GET /`: static landing page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}
