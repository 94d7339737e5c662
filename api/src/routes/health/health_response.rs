use relay_service::UpstreamHealth;
use serde::Serialize;

/// Response payload for `GET /chat/health`. Always served with 200.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub upstream_status: UpstreamHealth,
    pub timestamp: String,
}
