//! Automation-webhook (n8n) relay.
//!
//! One call per question:
//! - `GET {url}?message=<question>&timestamp=<RFC 3339>`
//! - optional `Authorization` (bearer token first, then basic auth)
//! - whole exchange bounded by the configured timeout
//!
//! Successful bodies go through [`crate::normalize`] because workflows
//! answer in arbitrary shapes.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::{Url, header};
use tracing::{debug, error, info, instrument};

use crate::{
    config::webhook_config::{UpstreamAuth, WebhookConfig},
    error_handler::{ConfigError, RelayError, Result, make_snippet},
    normalize::normalize,
    question::Question,
    relay::Relay,
};

/// Value reported as `source` in successful answers.
pub const WEBHOOK_SOURCE: &str = "n8n-chatbot";

/// Thin client for the automation webhook.
///
/// The HTTP client, parsed base URL and credential are resolved once at
/// construction and reused for every request.
#[derive(Debug)]
pub struct WebhookService {
    client: reqwest::Client,
    cfg: WebhookConfig,
    base_url: Option<Url>,
    auth: UpstreamAuth,
}

impl WebhookService {
    /// Creates a new [`WebhookService`].
    ///
    /// A config without `url` is accepted; every [`WebhookService::ask`] then
    /// fails with [`RelayError::ConfigurationMissing`].
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if `url` is not an absolute http(s) URL
    /// - [`ConfigError::Client`] if the HTTP client cannot be built
    pub fn new(cfg: WebhookConfig) -> std::result::Result<Self, ConfigError> {
        let base_url = match cfg.url.as_deref() {
            Some(raw) => {
                let url = Url::parse(raw.trim()).map_err(|_| ConfigError::InvalidFormat {
                    var: "N8N_WEBHOOK_URL",
                    reason: "must be an absolute URL",
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::InvalidFormat {
                        var: "N8N_WEBHOOK_URL",
                        reason: "must start with http:// or https://",
                    });
                }
                Some(url)
            }
            None => None,
        };

        let client = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        let auth = cfg.auth();

        info!(
            configured = base_url.is_some(),
            auth = auth_kind(&auth),
            timeout_ms = cfg.timeout.as_millis() as u64,
            "WebhookService initialized"
        );

        Ok(Self {
            client,
            cfg,
            base_url,
            auth,
        })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.cfg
    }

    /// Builds the outbound URL: base URL plus `message` and `timestamp`,
    /// appended after any query the base already carries.
    fn request_url(base: &Url, question: &Question) -> Url {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut url = base.clone();
        url.query_pairs_mut()
            .append_pair("message", question.as_str())
            .append_pair("timestamp", &timestamp);
        url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            UpstreamAuth::None => req,
            UpstreamAuth::Bearer(token) => req.bearer_auth(token),
            UpstreamAuth::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }
}

#[async_trait]
impl Relay for WebhookService {
    fn source(&self) -> &'static str {
        WEBHOOK_SOURCE
    }

    /// Relays one question and returns the normalized answer.
    ///
    /// # Errors
    /// - [`RelayError::ConfigurationMissing`] if no webhook URL is configured
    /// - [`RelayError::UpstreamTimeout`] / [`RelayError::UpstreamUnreachable`] for transport failures
    /// - [`RelayError::UpstreamHttp`] for non-2xx responses
    /// - [`RelayError::MalformedUpstreamResponse`] / [`RelayError::NoAnswerFound`] from normalization
    #[instrument(name = "webhook_ask", skip_all, fields(question_len = question.as_str().len()))]
    async fn ask(&self, question: &Question) -> Result<String> {
        let Some(base) = &self.base_url else {
            error!("N8N_WEBHOOK_URL is not configured");
            return Err(RelayError::ConfigurationMissing("N8N_WEBHOOK_URL"));
        };

        let started = Instant::now();
        let url = Self::request_url(base, question);
        debug!(url = %base, "GET webhook");

        let resp = self
            .authorize(self.client.get(url))
            .send()
            .await
            .map_err(|e| RelayError::from_transport(e, self.cfg.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(
                %status,
                url = %base,
                snippet = %make_snippet(&body),
                latency_ms = started.elapsed().as_millis() as u64,
                "webhook returned non-success status"
            );
            return Err(RelayError::UpstreamHttp {
                status: status.as_u16(),
                url: base.to_string(),
                body,
            });
        }

        let content_type = resp
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = resp
            .text()
            .await
            .map_err(|e| RelayError::from_transport(e, self.cfg.timeout))?;

        debug!(content_type = ?content_type, payload = %body, "webhook response");

        let extraction = normalize(content_type.as_deref(), &body).inspect_err(|e| {
            error!(
                error = %e,
                snippet = %make_snippet(&body),
                "failed to extract an answer from webhook response"
            );
        })?;

        info!(
            from = extraction.extracted_from.as_str(),
            answer_len = extraction.answer.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "webhook answered"
        );

        Ok(extraction.answer)
    }
}

fn auth_kind(auth: &UpstreamAuth) -> &'static str {
    match auth {
        UpstreamAuth::None => "none",
        UpstreamAuth::Bearer(_) => "bearer",
        UpstreamAuth::Basic { .. } => "basic",
    }
}
