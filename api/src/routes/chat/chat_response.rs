use serde::Serialize;

/// Response payload for `POST /chat`.
///
/// The success contract is fixed; upstream diagnostics only ever appear in
/// error payloads.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Trimmed answer text.
    pub answer: String,
    /// Which upstream produced it (`n8n-chatbot`, `gemini`).
    pub source: &'static str,
    /// RFC 3339 UTC, millisecond precision.
    pub timestamp: String,
}
