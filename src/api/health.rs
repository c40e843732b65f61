//! Health check and capability endpoints

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use super::ApiState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Capability report for the web UI
#[derive(Serialize)]
pub struct StatusResponse {
    pub version: &'static str,
    pub guidance_available: bool,
    pub audio_available: bool,
    pub summary_strategy: &'static str,
    pub audio_mode: &'static str,
}

/// Liveness check - is the service running?
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Which features the configured keys enable
async fn status(State(state): State<Arc<ApiState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION"),
        guidance_available: state.pipeline.guidance_available(),
        audio_available: state.pipeline.audio_available(),
        summary_strategy: state.pipeline.summary_kind().as_str(),
        audio_mode: state.audio_mode.as_str(),
    })
}

/// Build health router (liveness only, no state needed)
pub fn router() -> Router {
    Router::new().route("/health", get(health))
}

/// Build status router
pub fn status_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .with_state(state)
}
