pub mod default_config;
pub mod model_config;
pub mod relay_backend;
pub mod webhook_config;
