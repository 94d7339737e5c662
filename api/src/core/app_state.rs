use std::sync::Arc;

use relay_service::{Relay, RelayRuntime, health_service::HealthService};

/// Shared state for all HTTP handlers.
///
/// Holds no per-request data: every chat request is independent.
#[derive(Clone)]
pub struct AppState {
    /// The configured upstream (webhook or model).
    pub relay: Arc<dyn Relay>,
    /// Best-effort prober behind `/chat/health`.
    pub health: Arc<HealthService>,
}

impl From<RelayRuntime> for AppState {
    fn from(runtime: RelayRuntime) -> Self {
        Self {
            relay: runtime.relay,
            health: runtime.health,
        }
    }
}
