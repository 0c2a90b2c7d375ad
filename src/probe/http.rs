//! HTTP prober.
//!
//! # Responsibilities
//! - Build `GET {prefix}{target}/stats/` with the module's headers
//! - Classify the status code against the module's accepted set
//! - Extract the error counter from successful bodies
//!
//! # Design Decisions
//! - Two long-lived clients, one per redirect policy; the module timeout
//!   is applied per request
//! - HTTP/1.1 only, so a `Host` override reaches the wire (HTTP/2 would take
//!   `:authority` from the URL)
//! - A transport error with no response is a failed check, never an error
//! - Body problems only zero the counter; the verdict comes from the status

use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, HOST};
use reqwest::redirect::Policy;
use reqwest::{Client, Response};
use url::Url;

use crate::config::{HttpProbeConfig, Module};
use crate::probe::extract::extract_error_count;
use crate::probe::{ProbeOutcome, Prober};

/// Path appended to every target.
pub const STATS_PATH: &str = "/stats/";

const USER_AGENT: &str = concat!("sentry-exporter/", env!("CARGO_PKG_VERSION"));

/// Fully shaped probe request, before it is bound to a client.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub url: Url,
    /// Replaces the host taken from `url` on the wire.
    pub host: Option<String>,
    /// Headers sent verbatim. Never contains `Host`.
    pub headers: HeaderMap,
}

/// Build the request for `target` from the module's HTTP settings.
pub fn build_request(target: &str, config: &HttpProbeConfig) -> Result<ProbeRequest, url::ParseError> {
    let url = Url::parse(&format!("{}{}{}", config.prefix, target, STATS_PATH))?;

    let mut host = None;
    let mut headers = HeaderMap::new();
    for (name, value) in &config.headers {
        if name.eq_ignore_ascii_case("host") {
            host = Some(value.clone());
            continue;
        }
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid probe header"),
        }
    }

    Ok(ProbeRequest { url, host, headers })
}

/// Whether `status` counts as success.
///
/// A non-empty `valid` list replaces the default 2xx rule entirely.
pub fn status_accepted(status: u16, valid: &[u16]) -> bool {
    if valid.is_empty() {
        (200..300).contains(&status)
    } else {
        valid.contains(&status)
    }
}

/// Prober performing one HTTP request/response cycle per check.
#[derive(Debug, Clone)]
pub struct HttpProber {
    following: Client,
    direct: Client,
}

impl HttpProber {
    pub const NAME: &'static str = "http";

    pub fn new() -> Result<Self, reqwest::Error> {
        Ok(Self {
            following: Client::builder().user_agent(USER_AGENT).http1_only().build()?,
            direct: Client::builder()
                .user_agent(USER_AGENT)
                .http1_only()
                .redirect(Policy::none())
                .build()?,
        })
    }

    fn client(&self, follow_redirects: bool) -> &Client {
        if follow_redirects {
            &self.following
        } else {
            &self.direct
        }
    }

    async fn probe(&self, target: &str, module: &Module) -> ProbeOutcome {
        let config = &module.http;

        let request = match build_request(target, config) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(probe_target = target, error = %e, "Error creating request");
                return ProbeOutcome::no_response();
            }
        };

        let mut builder = self
            .client(config.follow_redirects)
            .get(request.url)
            .headers(request.headers);
        if let Some(host) = request.host {
            builder = builder.header(HOST, host);
        }
        if !module.timeout.is_zero() {
            builder = builder.timeout(module.timeout);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(probe_target = target, error = %e, "Error for HTTP request");
                return ProbeOutcome::no_response();
            }
        };

        let status_code = response.status().as_u16();
        let content_length = response
            .content_length()
            .map_or(-1, |len| i64::try_from(len).unwrap_or(i64::MAX));
        let success = status_accepted(status_code, &config.valid_status_codes);

        tracing::debug!(probe_target = target, status_code, success, "HTTP probe response");

        let error_received = if success {
            Some(read_error_count(target, response).await)
        } else {
            None
        };

        ProbeOutcome {
            success,
            status_code,
            content_length,
            error_received,
            duration: Duration::ZERO,
        }
    }
}

impl Prober for HttpProber {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn check<'a>(&'a self, target: &'a str, module: &'a Module) -> BoxFuture<'a, ProbeOutcome> {
        self.probe(target, module).boxed()
    }
}

async fn read_error_count(target: &str, response: Response) -> i64 {
    match response.text().await {
        Ok(body) => extract_error_count(&body),
        Err(e) => {
            tracing::error!(probe_target = target, error = %e, "Error reading HTTP body");
            0
        }
    }
}
