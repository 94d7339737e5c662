//! The single contract every backend fulfils, and its wiring from env.
//!
//! Construct once at startup, wrap in `Arc`, and pass clones to handlers.
//! Nothing here holds per-request state.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::{
    config::{
        default_config::{config_model, config_webhook, relay_backend},
        model_config::ModelConfig,
        relay_backend::RelayBackend,
        webhook_config::WebhookConfig,
    },
    error_handler::{ConfigError, Result},
    health_service::{HealthService, HealthTarget},
    question::Question,
    services::{model_service::ModelService, webhook_service::WebhookService},
};

/// Send a question, receive an answer string or a [`crate::RelayError`].
///
/// One upstream attempt per call; implementations never retry.
#[async_trait]
pub trait Relay: Send + Sync {
    /// Short identifier reported as `source` next to each answer.
    fn source(&self) -> &'static str;

    /// Relays a validated question to the upstream.
    async fn ask(&self, question: &Question) -> Result<String>;
}

/// Everything the HTTP layer needs: the active relay and its health prober.
#[derive(Clone)]
pub struct RelayRuntime {
    pub backend: RelayBackend,
    pub relay: Arc<dyn Relay>,
    pub health: Arc<HealthService>,
}

impl RelayRuntime {
    /// Loads the backend choice and its config from environment variables.
    ///
    /// # Errors
    /// Any [`ConfigError`] from config loading or client construction.
    pub fn from_env() -> std::result::Result<Self, ConfigError> {
        match relay_backend()? {
            RelayBackend::Webhook => Self::webhook(config_webhook()?),
            RelayBackend::Model => Self::model(config_model()?),
        }
    }

    /// Webhook backend; probes `health_check_url` when one is configured.
    pub fn webhook(cfg: WebhookConfig) -> std::result::Result<Self, ConfigError> {
        let target = cfg
            .health_check_url
            .clone()
            .map_or(HealthTarget::None, HealthTarget::Url);
        let health = HealthService::new(target, None)?;
        let relay = WebhookService::new(cfg)?;
        info!(backend = "webhook", "relay runtime ready");
        Ok(Self {
            backend: RelayBackend::Webhook,
            relay: Arc::new(relay),
            health: Arc::new(health),
        })
    }

    /// Model backend; probes the model resource when a key is configured.
    pub fn model(cfg: ModelConfig) -> std::result::Result<Self, ConfigError> {
        let target = match &cfg.api_key {
            Some(key) => HealthTarget::Model {
                url: cfg.model_url(),
                api_key: key.clone(),
            },
            None => HealthTarget::None,
        };
        let health = HealthService::new(target, None)?;
        let relay = ModelService::new(cfg)?;
        info!(backend = "model", "relay runtime ready");
        Ok(Self {
            backend: RelayBackend::Model,
            relay: Arc::new(relay),
            health: Arc::new(health),
        })
    }
}
