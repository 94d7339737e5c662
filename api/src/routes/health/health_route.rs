//! GET /chat/health: liveness plus a best-effort upstream probe.

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{SecondsFormat, Utc};
use tracing::instrument;

use crate::{core::app_state::AppState, routes::health::health_response::HealthResponse};

/// Handler: GET /chat/health
///
/// Never fails: the upstream probe result is reported, not propagated.
#[instrument(name = "health_route", skip_all)]
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let upstream_status = state.health.check().await;

    Json(HealthResponse {
        status: "Chat API is running",
        upstream_status,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
