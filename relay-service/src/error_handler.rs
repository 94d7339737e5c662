//! Unified error handling for `relay-service`.
//!
//! This module exposes a single top-level error type [`RelayError`] covering
//! every way a relayed question can fail, and groups startup validation in the
//! nested [`ConfigError`]. Small helpers for reading/validating environment
//! variables are provided and return the unified [`Result<T>`] alias.
//!
//! All messages include the suffix `[Relay Service]` to simplify attribution in logs.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/* ------------------------------------------------------------------------- */
/* Public result alias                                                       */
/* ------------------------------------------------------------------------- */

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, RelayError>;

/* ------------------------------------------------------------------------- */
/* Top-level error                                                           */
/* ------------------------------------------------------------------------- */

/// Top-level error for a single relayed request.
///
/// Every variant is terminal for the request it was raised in; nothing is
/// retried. The HTTP layer maps each variant to a status code and a
/// user-facing message.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller's body did not carry a usable `question`.
    #[error("[Relay Service] invalid input: {0}")]
    InvalidInput(String),

    /// The upstream for the active backend is not configured at all.
    #[error("[Relay Service] missing configuration: {0}")]
    ConfigurationMissing(&'static str),

    /// Startup/configuration validation errors.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The upstream call exceeded its deadline.
    #[error("[Relay Service] upstream timed out after {0:?}")]
    UpstreamTimeout(Duration),

    /// The upstream could not be reached (DNS, connect, reset).
    #[error("[Relay Service] upstream unreachable: {0}")]
    UpstreamUnreachable(String),

    /// Upstream answered with a non-successful HTTP status.
    #[error("[Relay Service] HTTP {status} from {url}: {}", make_snippet(.body))]
    UpstreamHttp {
        /// Numeric HTTP status code.
        status: u16,
        /// Request URL (without credentials).
        url: String,
        /// Response body as text, best effort.
        body: String,
    },

    /// Upstream declared structured data that failed to parse.
    #[error("[Relay Service] malformed upstream response: {reason}")]
    MalformedUpstreamResponse {
        /// Parser message.
        reason: String,
        /// Raw body kept for diagnostics.
        raw: String,
    },

    /// No answer could be extracted from an otherwise valid response.
    #[error("[Relay Service] no answer found in upstream response")]
    NoAnswerFound(Box<AnswerDebug>),

    /// Anything else.
    #[error("[Relay Service] internal error: {0}")]
    Internal(String),
}

impl RelayError {
    /// Classifies a `reqwest` transport failure.
    ///
    /// `timeout` is the deadline the client was built with, reported back in
    /// [`RelayError::UpstreamTimeout`].
    pub fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout(timeout)
        } else if err.is_connect() || err.is_request() {
            RelayError::UpstreamUnreachable(err.to_string())
        } else if err.is_decode() || err.is_body() {
            RelayError::MalformedUpstreamResponse {
                reason: err.to_string(),
                raw: String::new(),
            }
        } else {
            RelayError::Internal(err.to_string())
        }
    }
}

/// Diagnostics attached to [`RelayError::NoAnswerFound`].
///
/// Serialized verbatim into the `debug` field of the error payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDebug {
    /// `string`, `array`, `object`, `number`, `boolean` or `null`.
    pub response_type: &'static str,
    pub is_array: bool,
    /// Top-level keys when the response was an object.
    pub keys: Vec<String>,
    pub full_response: Value,
}

impl AnswerDebug {
    /// Builds diagnostics for a parsed upstream value.
    pub fn of(value: &Value) -> Self {
        let keys = match value {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        };
        Self {
            response_type: value_kind(value),
            is_array: value.is_array(),
            keys,
            full_response: value.clone(),
        }
    }
}

impl From<AnswerDebug> for RelayError {
    fn from(debug: AnswerDebug) -> Self {
        RelayError::NoAnswerFound(Box::new(debug))
    }
}

/// JSON type name of a value, as reported in diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/* ------------------------------------------------------------------------- */
/* Config errors                                                             */
/* ------------------------------------------------------------------------- */

/// Error enum for environment/config-driven setup.
///
/// Only errors that realistically happen at config load/validation time.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A number failed to parse (timeouts).
    #[error("[Relay Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        /// Variable name (e.g., `N8N_TIMEOUT_SECS`).
        var: &'static str,
        /// Human-readable reason (e.g., `expected u64`).
        reason: &'static str,
    },

    /// Unsupported backend in `RELAY_BACKEND`.
    #[error("[Relay Service] unsupported backend: {0}")]
    UnsupportedBackend(String),

    /// Value had the wrong format (e.g., invalid URL).
    #[error("[Relay Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        /// Variable name (e.g., `N8N_WEBHOOK_URL`).
        var: &'static str,
        /// Explanation (e.g., `must start with http:// or https://`).
        reason: &'static str,
    },

    /// The HTTP client could not be built.
    #[error("[Relay Service] failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/* ------------------------------------------------------------------------- */
/* Env helpers                                                               */
/* ------------------------------------------------------------------------- */

/// Reads an optional environment variable; empty or whitespace-only counts as unset.
pub fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses an optional `u64` from env (`Ok(None)` if unset/empty).
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] if the variable is set but not a valid `u64`.
pub fn env_opt_u64(name: &'static str) -> std::result::Result<Option<u64>, ConfigError> {
    match env_opt(name) {
        Some(v) => v.parse::<u64>().map(Some).map_err(|_| ConfigError::InvalidNumber {
            var: name,
            reason: "expected u64",
        }),
        None => Ok(None),
    }
}

/// Parses an optional number of any [`FromStr`](std::str::FromStr) type.
///
/// # Errors
/// Returns [`ConfigError::InvalidNumber`] with `reason` if the value does not parse.
pub fn env_opt_num<T: std::str::FromStr>(
    name: &'static str,
    reason: &'static str,
) -> std::result::Result<Option<T>, ConfigError> {
    env_opt(name)
        .map(|v| v.parse::<T>().map_err(|_| ConfigError::InvalidNumber { var: name, reason }))
        .transpose()
}

/* ------------------------------------------------------------------------- */
/* Validation helpers                                                        */
/* ------------------------------------------------------------------------- */

/// Validates that an HTTP endpoint starts with `http://` or `https://`.
///
/// # Errors
/// Returns [`ConfigError::InvalidFormat`] when the string does not start with
/// a valid HTTP scheme.
pub fn validate_http_endpoint(
    var: &'static str,
    value: &str,
) -> std::result::Result<(), ConfigError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        })
    }
}

/* ------------------------------------------------------------------------- */
/* Diagnostics helpers                                                       */
/* ------------------------------------------------------------------------- */

const SNIPPET_MAX_CHARS: usize = 300;

/// Single-line, bounded preview of an upstream body for logs and error text.
pub fn make_snippet(text: &str) -> String {
    let flat: String = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();
    let flat = flat.trim();
    if flat.chars().count() <= SNIPPET_MAX_CHARS {
        flat.to_string()
    } else {
        let cut: String = flat.chars().take(SNIPPET_MAX_CHARS).collect();
        format!("{cut}…")
    }
}

/// Returns `true` when a 404 body carries a hint that the remote workflow is
/// registered but not active (e.g. `{"hint":"Execute workflow to ..."}`).
///
/// Best effort: non-JSON bodies and bodies without a string `hint` yield `false`.
pub fn is_inactive_workflow_hint(body: &str) -> bool {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("hint").and_then(Value::as_str).map(str::to_owned))
        .is_some_and(|hint| hint.contains("Execute workflow"))
}
