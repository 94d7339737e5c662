pub mod model_service;
pub mod webhook_service;
