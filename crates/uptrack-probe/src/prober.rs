//! The prober: one HTTP request per endpoint, failures normalized.

use std::time::{Duration, Instant};

use reqwest::{Client, Method, redirect};
use tracing::{debug, warn};

use uptrack_config::{EndpointSpec, HttpMethod};

use crate::outcome::{FailureKind, ProbeOutcome};

/// Default per-request deadline, enforced at the transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default latency bound for counting a response as up.
pub const DEFAULT_LATENCY_THRESHOLD: Duration = Duration::from_millis(500);

/// Issues single-attempt probes and classifies the results.
///
/// One prober serves all endpoints and all cycles. The underlying client
/// pools connections and enforces the timeout at the transport, so a hung
/// peer cannot hold a probe past the deadline. Cloning is cheap and shares
/// the pool.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    latency_threshold: Duration,
}

impl Prober {
    /// Build a prober with the given request timeout and latency threshold.
    ///
    /// Redirects are not followed; a 3xx answer is reported as-is.
    pub fn new(timeout: Duration, latency_threshold: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            latency_threshold,
        })
    }

    /// Build a prober with the default timeout and threshold.
    pub fn with_defaults() -> anyhow::Result<Self> {
        Self::new(DEFAULT_TIMEOUT, DEFAULT_LATENCY_THRESHOLD)
    }

    /// Probe one endpoint: single attempt, no retries.
    ///
    /// Never returns an error; every failure mode is folded into the
    /// outcome. Transport failures are logged as warnings here, with the
    /// probed URL attached.
    pub async fn probe(&self, endpoint: &EndpointSpec) -> ProbeOutcome {
        let start = Instant::now();
        let result = self.send(endpoint).await;
        let latency = start.elapsed();

        match result {
            Ok(status) => {
                let succeeded = is_up(status, latency, self.latency_threshold);
                debug!(
                    host = endpoint.host(),
                    status,
                    latency_ms = latency.as_millis() as u64,
                    succeeded,
                    "probe completed"
                );
                ProbeOutcome {
                    host: endpoint.host().to_string(),
                    succeeded,
                    latency,
                    status: Some(status),
                    error: None,
                }
            }
            Err(e) => {
                let kind = classify(&e);
                warn!(
                    host = endpoint.host(),
                    url = %endpoint.url(),
                    error = %e,
                    kind = kind.as_str(),
                    "probe failed"
                );
                ProbeOutcome {
                    host: endpoint.host().to_string(),
                    succeeded: false,
                    latency,
                    status: None,
                    error: Some(kind),
                }
            }
        }
    }

    /// Send the request and drain the response body.
    ///
    /// The caller measures latency around this call, so response completion
    /// includes the body.
    async fn send(&self, endpoint: &EndpointSpec) -> reqwest::Result<u16> {
        let mut request = self
            .client
            .request(method_of(endpoint.method()), endpoint.url().as_str());
        for (name, value) in endpoint.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = endpoint.body() {
            request = request.body(body.to_string());
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        response.bytes().await?;
        Ok(status)
    }
}

/// Classification law: up iff the status is 2xx and the latency is strictly
/// under the threshold.
fn is_up(status: u16, latency: Duration, threshold: Duration) -> bool {
    (200..=299).contains(&status) && latency < threshold
}

/// Map a transport error to its failure kind. Timeout is checked first:
/// the client reports a deadline hit as a timeout even when it struck
/// mid-connect.
fn classify(error: &reqwest::Error) -> FailureKind {
    if error.is_timeout() {
        FailureKind::TimedOut
    } else if error.is_connect() {
        FailureKind::ConnectionFailed
    } else {
        FailureKind::Other
    }
}

/// Map the config-level method onto the client's method type.
fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
        HttpMethod::Patch => Method::PATCH,
    }
}
