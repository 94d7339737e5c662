//! Request validation: pulls a usable question out of a raw request body.

use serde_json::Value;

use crate::error_handler::{RelayError, Result};

/// A non-empty, trimmed question. Only constructible through validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question(String);

impl Question {
    /// Validates a raw JSON body of the shape `{ "question": string }`.
    ///
    /// # Errors
    /// [`RelayError::InvalidInput`] when the body is not a JSON object, the
    /// field is missing or not a string, or the string is blank.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| RelayError::InvalidInput(format!("body is not valid JSON: {e}")))?;
        Self::from_value(&value)
    }

    /// Same as [`Question::from_body`] for an already-parsed value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let field = value
            .as_object()
            .ok_or_else(|| RelayError::InvalidInput("body must be a JSON object".into()))?
            .get("question")
            .ok_or_else(|| RelayError::InvalidInput("missing `question`".into()))?;
        let text = field
            .as_str()
            .ok_or_else(|| RelayError::InvalidInput("`question` must be a string".into()))?;
        Self::new(text)
    }

    /// Trims `text` and rejects it if nothing is left.
    pub fn new(text: &str) -> Result<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(RelayError::InvalidInput("`question` is empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
