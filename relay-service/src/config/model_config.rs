use std::time::Duration;

/// Configuration for the hosted generative-language model upstream.
///
/// # Fields
///
/// - `endpoint`: API base (e.g. `https://generativelanguage.googleapis.com`).
/// - `model`: model identifier (e.g. `"gemini-1.5-flash"`).
/// - `api_key`: credential, resolved once at startup. `None` makes every
///   request fail with a configuration error.
/// - `temperature` / `max_output_tokens`: optional generation knobs.
/// - `timeout`: request deadline.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout: Duration,
}

impl ModelConfig {
    /// `{endpoint}/v1beta/models/{model}`; the generate and health URLs hang off it.
    pub fn model_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}
