//! POST /chat: relays one question to the configured upstream.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use chrono::{SecondsFormat, Utc};
use relay_service::Question;
use tracing::{debug, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::AppResult,
    routes::chat::chat_response::ChatResponse,
};

/// Handler: POST /chat
///
/// The body is validated before any upstream I/O, so a malformed request
/// never reaches the webhook or the model.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:3000/chat \
///   -H 'content-type: application/json' \
///   -d '{"question":"What is a borrow checker?"}'
/// ```
#[instrument(name = "chat_route", skip_all, fields(source = state.relay.source()))]
pub async fn chat_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<ChatResponse>> {
    if let Some(id) = headers.get("X-Request-Id").and_then(|h| h.to_str().ok()) {
        debug!(%id, "request id attached");
    }

    let question = Question::from_body(&body)?;
    let answer = state.relay.ask(&question).await?;

    info!(answer_len = answer.len(), "question answered");

    Ok(Json(ChatResponse {
        answer,
        source: state.relay.source(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
