//! Stateless question relay with two interchangeable upstreams.
//!
//! - **Webhook**: `GET` to an automation webhook (n8n) with the question as a
//!   query parameter; the heterogeneous answer is normalized by [`normalize`].
//! - **Model**: the question is sent verbatim to a hosted generative-language
//!   model and its text output is returned.
//!
//! Both implement [`relay::Relay`]. Build them from env with
//! [`relay::RelayRuntime::from_env`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod normalize;
pub mod question;
pub mod relay;
pub mod services;
pub mod telemetry;

pub use error_handler::{AnswerDebug, ConfigError, RelayError};
pub use health_service::UpstreamHealth;
pub use question::Question;
pub use relay::{Relay, RelayRuntime};
