use std::time::Duration;

/// Configuration for the automation-webhook upstream.
///
/// `url` may be absent: the relay still boots and answers every question
/// with a configuration error, distinct from a network failure.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use relay_service::config::webhook_config::{UpstreamAuth, WebhookConfig};
///
/// let cfg = WebhookConfig {
///     url: Some("https://n8n.example.com/webhook/chat".into()),
///     api_key: Some("token".into()),
///     username: Some("bot".into()),
///     password: Some("secret".into()),
///     health_check_url: None,
///     timeout: Duration::from_secs(30),
/// };
///
/// // Bearer token wins over basic auth.
/// assert_eq!(cfg.auth(), UpstreamAuth::Bearer("token".into()));
/// ```
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Webhook base URL; query parameters are appended to it.
    pub url: Option<String>,

    /// Optional bearer token.
    pub api_key: Option<String>,

    /// Optional basic-auth username (used only together with `password`).
    pub username: Option<String>,

    /// Optional basic-auth password (used only together with `username`).
    pub password: Option<String>,

    /// Optional URL for the health probe.
    pub health_check_url: Option<String>,

    /// Hard deadline for the whole upstream exchange.
    pub timeout: Duration,
}

/// Credential attached to outbound webhook calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamAuth {
    None,
    Bearer(String),
    Basic { username: String, password: String },
}

impl WebhookConfig {
    /// Resolves the single credential to send.
    ///
    /// Precedence is fixed: bearer token first, then the basic-auth pair,
    /// otherwise no `Authorization` header.
    pub fn auth(&self) -> UpstreamAuth {
        if let Some(token) = &self.api_key {
            return UpstreamAuth::Bearer(token.clone());
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => UpstreamAuth::Basic {
                username: username.clone(),
                password: password.clone(),
            },
            _ => UpstreamAuth::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> WebhookConfig {
        WebhookConfig {
            url: Some("http://localhost:5678/webhook/chat".into()),
            api_key: None,
            username: None,
            password: None,
            health_check_url: None,
            timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn basic_auth_requires_both_halves() {
        let mut c = cfg();
        c.username = Some("bot".into());
        assert_eq!(c.auth(), UpstreamAuth::None);

        c.password = Some("pw".into());
        assert_eq!(
            c.auth(),
            UpstreamAuth::Basic {
                username: "bot".into(),
                password: "pw".into()
            }
        );
    }

    #[test]
    fn bearer_takes_priority() {
        let mut c = cfg();
        c.username = Some("bot".into());
        c.password = Some("pw".into());
        c.api_key = Some("tok".into());
        assert_eq!(c.auth(), UpstreamAuth::Bearer("tok".into()));
    }
}
