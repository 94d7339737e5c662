use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use relay_service::{
    AnswerDebug, ConfigError, RelayError, error_handler::is_inactive_workflow_hint,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request ---
    /// User-facing failure of a relayed question, with optional diagnostics.
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: &'static str,
        diagnostics: Diagnostics,
    },
}

/// Extra fields attached to an error payload. Never present on success.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<&'static str>,
    /// Raw upstream body that failed to parse.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Box<AnswerDebug>>,
}

pub const MSG_INVALID_INPUT: &str = "Please provide a valid question.";
pub const MSG_NOT_CONFIGURED: &str = "Chatbot service is not properly configured.";
pub const MSG_WEBHOOK_INACTIVE: &str = "Chatbot webhook is not active.";
pub const MSG_WORKFLOW_INACTIVE: &str =
    "Chatbot workflow is not active. Please activate the workflow in n8n.";
pub const MSG_UNAVAILABLE: &str = "Chatbot service is currently unavailable.";
pub const MSG_INVALID_FORMAT: &str = "Invalid response format from chatbot.";
pub const MSG_NO_ANSWER: &str = "No response received from chatbot";
pub const MSG_TIMEOUT: &str = "Request timed out. Please try again.";
pub const MSG_UNREACHABLE: &str = "Unable to connect to chatbot service.";
pub const MSG_INTERNAL: &str = "An unexpected error occurred. Please try again.";

const DETAILS_WEBHOOK_INACTIVE: &str =
    "The n8n workflow needs to be activated or the webhook URL might be incorrect.";

impl AppError {
    fn http(status: StatusCode, message: &'static str) -> Self {
        AppError::Http {
            status,
            message,
            diagnostics: Diagnostics::default(),
        }
    }

    fn with(status: StatusCode, message: &'static str, diagnostics: Diagnostics) -> Self {
        AppError::Http {
            status,
            message,
            diagnostics,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            AppError::Config(_) | AppError::Bind(_) | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(flatten)]
    diagnostics: &'a Diagnostics,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Http {
                message,
                diagnostics,
                ..
            } => {
                let body = ErrorBody {
                    error: message,
                    diagnostics,
                };
                (status, Json(body)).into_response()
            }
            // Startup-only variants; never leak their text to a caller.
            _ => {
                let body = ErrorBody {
                    error: MSG_INTERNAL,
                    diagnostics: &Diagnostics::default(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Maps every relay failure to a status code and a user-facing message.
///
/// | relay error                 | status |
/// |-----------------------------|--------|
/// | invalid input               | 400    |
/// | configuration missing       | 500    |
/// | upstream 404                | 503    |
/// | upstream other non-2xx      | 502    |
/// | malformed upstream body     | 502    |
/// | no answer                   | 500    |
/// | timeout                     | 408    |
/// | unreachable                 | 503    |
/// | anything else               | 500    |
impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::InvalidInput(reason) => {
                warn!(%reason, "rejected question");
                AppError::http(StatusCode::BAD_REQUEST, MSG_INVALID_INPUT)
            }
            RelayError::ConfigurationMissing(var) => {
                error!(%var, "relay is not configured");
                AppError::http(StatusCode::INTERNAL_SERVER_ERROR, MSG_NOT_CONFIGURED)
            }
            RelayError::Config(e) => {
                error!(error = %e, "relay configuration error");
                AppError::http(StatusCode::INTERNAL_SERVER_ERROR, MSG_NOT_CONFIGURED)
            }
            RelayError::UpstreamHttp { status: 404, body, .. } => {
                let message = if is_inactive_workflow_hint(&body) {
                    MSG_WORKFLOW_INACTIVE
                } else {
                    MSG_WEBHOOK_INACTIVE
                };
                AppError::with(
                    StatusCode::SERVICE_UNAVAILABLE,
                    message,
                    Diagnostics {
                        details: Some(DETAILS_WEBHOOK_INACTIVE),
                        ..Diagnostics::default()
                    },
                )
            }
            RelayError::UpstreamHttp { .. } => {
                AppError::http(StatusCode::BAD_GATEWAY, MSG_UNAVAILABLE)
            }
            RelayError::MalformedUpstreamResponse { raw, .. } => AppError::with(
                StatusCode::BAD_GATEWAY,
                MSG_INVALID_FORMAT,
                Diagnostics {
                    raw: Some(raw),
                    ..Diagnostics::default()
                },
            ),
            RelayError::NoAnswerFound(debug) => AppError::with(
                StatusCode::INTERNAL_SERVER_ERROR,
                MSG_NO_ANSWER,
                Diagnostics {
                    debug: Some(debug),
                    ..Diagnostics::default()
                },
            ),
            RelayError::UpstreamTimeout(after) => {
                warn!(?after, "upstream timed out");
                AppError::http(StatusCode::REQUEST_TIMEOUT, MSG_TIMEOUT)
            }
            RelayError::UpstreamUnreachable(reason) => {
                warn!(%reason, "upstream unreachable");
                AppError::http(StatusCode::SERVICE_UNAVAILABLE, MSG_UNREACHABLE)
            }
            other => {
                error!(error = %other, "relay failed");
                AppError::http(StatusCode::INTERNAL_SERVER_ERROR, MSG_INTERNAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::time::Duration;

    fn classify(err: RelayError) -> (StatusCode, Value) {
        let app = AppError::from(err);
        let status = app.status_code();
        let AppError::Http {
            message,
            diagnostics,
            ..
        } = app
        else {
            panic!("expected an HTTP error");
        };
        let body = serde_json::to_value(ErrorBody {
            error: message,
            diagnostics: &diagnostics,
        })
        .unwrap();
        (status, body)
    }

    #[test]
    fn status_table() {
        let cases = [
            (RelayError::InvalidInput("x".into()), 400),
            (RelayError::ConfigurationMissing("N8N_WEBHOOK_URL"), 500),
            (
                RelayError::UpstreamHttp {
                    status: 404,
                    url: "u".into(),
                    body: String::new(),
                },
                503,
            ),
            (
                RelayError::UpstreamHttp {
                    status: 500,
                    url: "u".into(),
                    body: String::new(),
                },
                502,
            ),
            (
                RelayError::MalformedUpstreamResponse {
                    reason: "r".into(),
                    raw: "{".into(),
                },
                502,
            ),
            (AnswerDebug::of(&json!([])).into(), 500),
            (RelayError::UpstreamTimeout(Duration::from_secs(30)), 408),
            (RelayError::UpstreamUnreachable("refused".into()), 503),
            (RelayError::Internal("boom".into()), 500),
        ];
        for (err, expected) in cases {
            let label = err.to_string();
            let (status, _) = classify(err);
            assert_eq!(status.as_u16(), expected, "{label}");
        }
    }

    #[test]
    fn inactive_workflow_hint_refines_message() {
        let (status, body) = classify(RelayError::UpstreamHttp {
            status: 404,
            url: "u".into(),
            body: r#"{"hint":"Execute workflow to activate"}"#.into(),
        });
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], MSG_WORKFLOW_INACTIVE);
        assert_eq!(body["details"], DETAILS_WEBHOOK_INACTIVE);

        let (_, body) = classify(RelayError::UpstreamHttp {
            status: 404,
            url: "u".into(),
            body: "Not Found".into(),
        });
        assert_eq!(body["error"], MSG_WEBHOOK_INACTIVE);
    }

    #[test]
    fn diagnostics_only_where_relevant() {
        let (_, body) = classify(RelayError::UpstreamTimeout(Duration::from_secs(1)));
        assert_eq!(body, json!({ "error": MSG_TIMEOUT }));

        let (_, body) = classify(RelayError::MalformedUpstreamResponse {
            reason: "r".into(),
            raw: "<html>".into(),
        });
        assert_eq!(body["raw"], "<html>");

        let (_, body) = classify(AnswerDebug::of(&json!({ "k": 1 })).into());
        assert_eq!(body["debug"]["responseType"], "object");
        assert_eq!(body["debug"]["keys"], json!(["k"]));
    }
}
