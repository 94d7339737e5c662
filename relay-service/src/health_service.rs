//! Best-effort upstream health probe for the `/chat/health` endpoint.
//!
//! [`HealthService::check`] never fails: every outcome maps to one of
//! [`UpstreamHealth`]'s three states.
//! - no target configured  → `unknown`
//! - 2xx                   → `healthy`
//! - non-2xx               → `unknown`
//! - transport error       → `unhealthy`

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error_handler::{ConfigError, make_snippet};

/// Default probe deadline.
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Upstream state as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamHealth {
    Healthy,
    Unhealthy,
    Unknown,
}

/// What to probe.
#[derive(Debug, Clone)]
pub enum HealthTarget {
    /// Nothing configured; always `unknown`.
    None,
    /// Plain `GET` (webhook health URL).
    Url(String),
    /// `GET` on the model resource with the API key header.
    Model { url: String, api_key: String },
}

/// Health checker reusing a single short-timeout HTTP client.
#[derive(Debug)]
pub struct HealthService {
    client: reqwest::Client,
    target: HealthTarget,
}

impl HealthService {
    /// Creates a new health service with an optional timeout (defaults to 5s).
    ///
    /// # Errors
    /// [`ConfigError::Client`] if the HTTP client cannot be built.
    pub fn new(target: HealthTarget, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        let timeout = timeout.unwrap_or(DEFAULT_HEALTH_TIMEOUT);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        info!(
            timeout_ms = timeout.as_millis() as u64,
            has_target = !matches!(target, HealthTarget::None),
            "HealthService initialized"
        );

        Ok(Self { client, target })
    }

    /// Probes the target once. Never returns an error.
    pub async fn check(&self) -> UpstreamHealth {
        let req = match &self.target {
            HealthTarget::None => {
                debug!("no health target configured");
                return UpstreamHealth::Unknown;
            }
            HealthTarget::Url(url) => self.client.get(url),
            HealthTarget::Model { url, api_key } => {
                self.client.get(url).header("x-goog-api-key", api_key)
            }
        };

        let start = Instant::now();
        match req.send().await {
            Ok(resp) if resp.status().is_success() => {
                info!(
                    status = %resp.status(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "health probe completed"
                );
                UpstreamHealth::Healthy
            }
            Ok(resp) => {
                let status = resp.status();
                let text = resp.text().await.unwrap_or_default();
                warn!(
                    %status,
                    snippet = %make_snippet(&text),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "health probe returned non-success status"
                );
                UpstreamHealth::Unknown
            }
            Err(err) => {
                warn!(
                    error = %err,
                    timeout = err.is_timeout(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "health probe failed"
                );
                UpstreamHealth::Unhealthy
            }
        }
    }
}
