use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the upstream a question is relayed to.
///
/// Both variants sit behind the same [`crate::relay::Relay`] contract:
/// a question goes in, an answer string (or a [`crate::RelayError`]) comes out.
///
/// # Examples
///
/// ```
/// use relay_service::config::relay_backend::RelayBackend;
///
/// let backend: RelayBackend = "gemini".parse().unwrap();
/// assert_eq!(backend, RelayBackend::Model);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelayBackend {
    /// Automation webhook (n8n) called with `GET ?message=&timestamp=`.
    #[default]
    Webhook,
    /// Hosted generative-language model.
    Model,
}

impl FromStr for RelayBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "webhook" | "n8n" => Ok(RelayBackend::Webhook),
            "model" | "gemini" => Ok(RelayBackend::Model),
            other => Err(ConfigError::UnsupportedBackend(other.to_string())),
        }
    }
}
