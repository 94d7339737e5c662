//! Shape-aware answer extraction for heterogeneous webhook responses.
//!
//! Automation workflows answer in whatever shape their last node produced:
//! a bare string, an object with the text under one of several names, or an
//! array of such objects. [`normalize`] turns any of them into one trimmed
//! answer string.
//!
//! Algorithm:
//! 1. Structured content types (`*json*`) are parsed; anything else is text.
//! 2. The value is classified into an [`UpstreamShape`].
//! 3. Strings are the answer. Arrays contribute their first element only.
//!    Records are probed with [`ANSWER_FIELDS`] in order, then the same
//!    order is probed inside a nested `body` record.
//! 4. Non-string hits are stringified, the result is trimmed, and a blank
//!    result counts as no answer.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error_handler::{AnswerDebug, RelayError, Result, value_kind};

/// Field names probed on a record, highest priority first.
pub const ANSWER_FIELDS: [&str; 8] = [
    "answer", "response", "message", "text", "output", "result", "content", "reply",
];

/// Name of the nested record probed when no top-level field matched.
pub const NESTED_BODY_FIELD: &str = "body";

/// The three response shapes an upstream can produce.
#[derive(Debug, Clone, Copy)]
pub enum UpstreamShape<'a> {
    PlainString(&'a str),
    ObjectRecord(&'a Map<String, Value>),
    /// Only the first element is significant.
    ArrayOfRecords(&'a [Value]),
}

impl<'a> UpstreamShape<'a> {
    /// Classifies a parsed value. Top-level numbers, booleans and `null`
    /// are not one of the three shapes and yield `None`.
    pub fn classify(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::PlainString(s)),
            Value::Object(map) => Some(Self::ObjectRecord(map)),
            Value::Array(items) => Some(Self::ArrayOfRecords(items)),
            Value::Number(_) | Value::Bool(_) | Value::Null => None,
        }
    }
}

/// Where in the response the answer was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractedFrom {
    String,
    /// `array[0]`, either a string element or a record probed by field.
    ArrayFirst,
    Object,
    /// The nested `body` record of an object (or of `array[0]`).
    NestedBody,
}

impl ExtractedFrom {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractedFrom::String => "string",
            ExtractedFrom::ArrayFirst => "array[0]",
            ExtractedFrom::Object => "object",
            ExtractedFrom::NestedBody => "object.body",
        }
    }
}

/// A successfully extracted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Trimmed, non-empty answer text.
    pub answer: String,
    pub extracted_from: ExtractedFrom,
}

/// Returns `true` when the declared content type denotes JSON.
pub fn is_structured(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
}

/// Turns a raw body into a JSON value according to its content type.
///
/// Non-structured bodies become a JSON string holding the raw text.
///
/// # Errors
/// [`RelayError::MalformedUpstreamResponse`] when a structured body fails to
/// parse; the raw text is kept for diagnostics.
pub fn parse_body(content_type: Option<&str>, body: &str) -> Result<Value> {
    if !is_structured(content_type) {
        return Ok(Value::String(body.to_string()));
    }
    serde_json::from_str(body).map_err(|e| RelayError::MalformedUpstreamResponse {
        reason: e.to_string(),
        raw: body.to_string(),
    })
}

/// Parses and extracts in one step. See the module docs for the algorithm.
///
/// # Errors
/// - [`RelayError::MalformedUpstreamResponse`] if a JSON body does not parse
/// - [`RelayError::NoAnswerFound`] if no non-blank answer can be extracted
pub fn normalize(content_type: Option<&str>, body: &str) -> Result<Extraction> {
    let value = parse_body(content_type, body)?;
    extract(&value)
}

/// Extracts the answer from an already-parsed upstream value.
///
/// # Errors
/// [`RelayError::NoAnswerFound`] with [`AnswerDebug`] diagnostics.
pub fn extract(value: &Value) -> Result<Extraction> {
    let found = find_candidate(value);

    let Some((candidate, extracted_from)) = found else {
        debug!(shape = value_kind(value), "no answer field matched");
        return Err(AnswerDebug::of(value).into());
    };

    let answer = stringify(candidate).trim().to_string();
    if answer.is_empty() {
        debug!(from = extracted_from.as_str(), "answer was blank after trimming");
        return Err(AnswerDebug::of(value).into());
    }

    debug!(from = extracted_from.as_str(), answer_len = answer.len(), "answer extracted");
    Ok(Extraction {
        answer,
        extracted_from,
    })
}

fn find_candidate(value: &Value) -> Option<(&Value, ExtractedFrom)> {
    match UpstreamShape::classify(value)? {
        UpstreamShape::PlainString(s) => {
            (!s.is_empty()).then_some((value, ExtractedFrom::String))
        }
        UpstreamShape::ObjectRecord(map) => search_record(map, ExtractedFrom::Object),
        UpstreamShape::ArrayOfRecords(items) => match items.first()? {
            first @ Value::String(_) => {
                is_present(first).then_some((first, ExtractedFrom::ArrayFirst))
            }
            Value::Object(map) => search_record(map, ExtractedFrom::ArrayFirst),
            _ => None,
        },
    }
}

fn search_record(
    map: &Map<String, Value>,
    top_level: ExtractedFrom,
) -> Option<(&Value, ExtractedFrom)> {
    if let Some(v) = search_fields(map) {
        return Some((v, top_level));
    }
    map.get(NESTED_BODY_FIELD)
        .and_then(Value::as_object)
        .and_then(search_fields)
        .map(|v| (v, ExtractedFrom::NestedBody))
}

fn search_fields(map: &Map<String, Value>) -> Option<&Value> {
    ANSWER_FIELDS
        .iter()
        .find_map(|field| map.get(*field).filter(|v| is_present(v)))
}

/// `null`, `""`, `false` and numeric zero are treated as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
