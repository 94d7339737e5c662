use std::sync::Arc;

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use relay_service::{RelayRuntime, error_handler::env_opt};
use tokio::signal;
use tracing::{error, info};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    routes::{chat::chat_route::chat_route, health::health_route::health_route},
};

/// Listen address used when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:3000";

/// Build the router around an already-constructed relay runtime.
///
/// - `POST /chat`, `GET /chat/health`
/// - `POST /api/chat`, `GET /api/chat` (paths used by the bundled web front end)
pub fn build_app(runtime: RelayRuntime) -> Router {
    let state = Arc::new(AppState::from(runtime));

    Router::new()
        .route("/chat", post(chat_route))
        .route("/chat/health", get(health_route))
        .route("/api/chat", post(chat_route).get(health_route))
        .with_state(state)
}

/// Load config from env, bind `API_ADDRESS` and serve until Ctrl+C.
pub async fn start() -> Result<(), AppError> {
    let host_url = env_opt("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string());

    let runtime = RelayRuntime::from_env()?;
    let app = build_app(runtime);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;

    info!(%host_url, "chat relay listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
