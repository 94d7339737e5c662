//! Hosted generative-language model relay (Gemini `generateContent`).
//!
//! The question is forwarded verbatim as the prompt:
//! - `POST {endpoint}/v1beta/models/{model}:generateContent`
//! - `x-goog-api-key: <key>`
//!
//! The model API returns one text field per candidate part, so no shape
//! normalization is needed; the parts of the first candidate are joined.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::{
    config::model_config::ModelConfig,
    error_handler::{AnswerDebug, ConfigError, RelayError, Result, make_snippet, validate_http_endpoint},
    question::Question,
    relay::Relay,
};

/// Value reported as `source` in successful answers.
pub const MODEL_SOURCE: &str = "gemini";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Thin client for the model API.
///
/// The credential is resolved once at startup and baked into the client's
/// default headers; a missing key is reported per request.
#[derive(Debug)]
pub struct ModelService {
    client: reqwest::Client,
    cfg: ModelConfig,
    url_generate: String,
}

impl ModelService {
    /// Creates a new [`ModelService`] from the given config.
    ///
    /// # Errors
    /// - [`ConfigError::InvalidFormat`] if the endpoint or API key is unusable
    /// - [`ConfigError::Client`] if the HTTP client cannot be built
    pub fn new(cfg: ModelConfig) -> std::result::Result<Self, ConfigError> {
        validate_http_endpoint("GEMINI_URL", cfg.endpoint.trim())?;

        let mut headers = header::HeaderMap::new();
        if let Some(key) = &cfg.api_key {
            let value =
                header::HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidFormat {
                    var: "GEMINI_API_KEY",
                    reason: "not a valid header value",
                })?;
            headers.insert(API_KEY_HEADER, value);
        }
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .default_headers(headers)
            .build()?;

        let url_generate = format!("{}:generateContent", cfg.model_url());

        info!(
            model = %cfg.model,
            endpoint = %cfg.endpoint,
            has_key = cfg.api_key.is_some(),
            timeout_ms = cfg.timeout.as_millis() as u64,
            "ModelService initialized"
        );

        Ok(Self {
            client,
            cfg,
            url_generate,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.cfg
    }
}

#[async_trait]
impl Relay for ModelService {
    fn source(&self) -> &'static str {
        MODEL_SOURCE
    }

    /// Performs a single, non-streaming `generateContent` call.
    ///
    /// # Errors
    /// - [`RelayError::ConfigurationMissing`] if no API key is configured
    /// - [`RelayError::UpstreamTimeout`] / [`RelayError::UpstreamUnreachable`] for transport failures
    /// - [`RelayError::UpstreamHttp`] for non-2xx responses
    /// - [`RelayError::MalformedUpstreamResponse`] if the JSON cannot be decoded
    /// - [`RelayError::NoAnswerFound`] if the first candidate carries no text
    #[instrument(name = "model_ask", skip_all, fields(model = %self.cfg.model))]
    async fn ask(&self, question: &Question) -> Result<String> {
        if self.cfg.api_key.is_none() {
            error!("GEMINI_API_KEY is not configured");
            return Err(RelayError::ConfigurationMissing("GEMINI_API_KEY"));
        }

        let started = Instant::now();
        let body = GenerateContentRequest::from_cfg(&self.cfg, question.as_str());

        debug!(prompt_len = question.as_str().len(), "POST {}", self.url_generate);

        let resp = self
            .client
            .post(&self.url_generate)
            .json(&body)
            .send()
            .await
            .map_err(|e| RelayError::from_transport(e, self.cfg.timeout))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RelayError::from_transport(e, self.cfg.timeout))?;

        if !status.is_success() {
            error!(
                %status,
                url = %self.url_generate,
                snippet = %make_snippet(&text),
                latency_ms = started.elapsed().as_millis() as u64,
                "generateContent returned non-success status"
            );
            return Err(RelayError::UpstreamHttp {
                status: status.as_u16(),
                url: self.url_generate.clone(),
                body: text,
            });
        }

        let raw: Value = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, snippet = %make_snippet(&text), "failed to decode generateContent response");
            RelayError::MalformedUpstreamResponse {
                reason: e.to_string(),
                raw: text.clone(),
            }
        })?;
        let out: GenerateContentResponse =
            serde_json::from_value(raw.clone()).map_err(|e| RelayError::MalformedUpstreamResponse {
                reason: format!("{e}; expected `candidates[0].content.parts[].text`"),
                raw: text.clone(),
            })?;

        let answer = out.first_text();
        if answer.is_empty() {
            error!(
                finish_reason = ?out.candidates.first().and_then(|c| c.finish_reason.as_deref()),
                "generateContent returned no text"
            );
            return Err(AnswerDebug::of(&raw).into());
        }

        info!(
            answer_len = answer.len(),
            latency_ms = started.elapsed().as_millis() as u64,
            "model answered"
        );

        Ok(answer)
    }
}

/* ===========================================================================
HTTP payloads
======================================================================== */

/// Minimal request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_cfg(cfg: &ModelConfig, prompt: &'a str) -> Self {
        let generation_config = (cfg.temperature.is_some() || cfg.max_output_tokens.is_some())
            .then_some(GenerationConfig {
                temperature: cfg.temperature,
                max_output_tokens: cfg.max_output_tokens,
            });
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config,
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Minimal response for `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Joined, trimmed text of the first candidate's parts.
    fn first_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    text: Option<String>,
}
