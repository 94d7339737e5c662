//! Relay configs loaded strictly from environment variables.
//!
//! # Environment variables
//!
//! Common:
//! - `RELAY_BACKEND` = `webhook` (default) or `model`
//!
//! Webhook:
//! - `N8N_WEBHOOK_URL`      = webhook base URL (optional at startup)
//! - `N8N_API_KEY`          = bearer token
//! - `N8N_USERNAME` / `N8N_PASSWORD` = basic-auth pair
//! - `N8N_HEALTH_CHECK_URL` = health probe target
//! - `N8N_TIMEOUT_SECS`     = upstream timeout, default 30
//!
//! Model:
//! - `GEMINI_API_KEY`       = API key (optional at startup)
//! - `GEMINI_MODEL`         = model id, default `gemini-1.5-flash`
//! - `GEMINI_URL`           = API base, default `https://generativelanguage.googleapis.com`
//! - `GEMINI_TIMEOUT_SECS`  = timeout, default 30
//! - `GEMINI_TEMPERATURE` / `GEMINI_MAX_OUTPUT_TOKENS` = optional generation settings

use std::time::Duration;

use crate::{
    config::{model_config::ModelConfig, relay_backend::RelayBackend, webhook_config::WebhookConfig},
    error_handler::{ConfigError, env_opt, env_opt_num, env_opt_u64, validate_http_endpoint},
};

/// Default upstream deadline, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Reads `RELAY_BACKEND`, defaulting to [`RelayBackend::Webhook`].
///
/// # Errors
/// [`ConfigError::UnsupportedBackend`] for unknown values.
pub fn relay_backend() -> Result<RelayBackend, ConfigError> {
    env_opt("RELAY_BACKEND")
        .map(|v| v.parse())
        .unwrap_or(Ok(RelayBackend::Webhook))
}

/// Constructs the webhook config.
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if a URL lacks an http/https scheme
/// - [`ConfigError::InvalidNumber`] if `N8N_TIMEOUT_SECS` is not a `u64`
pub fn config_webhook() -> Result<WebhookConfig, ConfigError> {
    let url = env_opt("N8N_WEBHOOK_URL");
    if let Some(url) = &url {
        validate_http_endpoint("N8N_WEBHOOK_URL", url)?;
    }
    let health_check_url = env_opt("N8N_HEALTH_CHECK_URL");
    if let Some(url) = &health_check_url {
        validate_http_endpoint("N8N_HEALTH_CHECK_URL", url)?;
    }
    let timeout_secs = env_opt_u64("N8N_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(WebhookConfig {
        url,
        api_key: env_opt("N8N_API_KEY"),
        username: env_opt("N8N_USERNAME"),
        password: env_opt("N8N_PASSWORD"),
        health_check_url,
        timeout: Duration::from_secs(timeout_secs),
    })
}

/// Constructs the model config.
///
/// # Defaults
/// - `temperature = None`, `max_output_tokens = None` (provider defaults)
/// - `timeout = 30s`
///
/// # Errors
/// - [`ConfigError::InvalidFormat`] if `GEMINI_URL` lacks an http/https scheme
/// - [`ConfigError::InvalidNumber`] if a numeric variable does not parse
pub fn config_model() -> Result<ModelConfig, ConfigError> {
    let endpoint = env_opt("GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string());
    validate_http_endpoint("GEMINI_URL", &endpoint)?;
    let timeout_secs = env_opt_u64("GEMINI_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS);

    Ok(ModelConfig {
        endpoint,
        model: env_opt("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
        api_key: env_opt("GEMINI_API_KEY"),
        temperature: env_opt_num("GEMINI_TEMPERATURE", "expected a decimal number")?,
        max_output_tokens: env_opt_num("GEMINI_MAX_OUTPUT_TOKENS", "expected u32")?,
        timeout: Duration::from_secs(timeout_secs),
    })
}
