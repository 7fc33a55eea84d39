use super::state::AppState;
use crate::session::SessionStats;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session_id: String,
    pub status: String,
    pub message: String,
    pub stats: SessionStats,
}

/// GET /session/status
/// Current session statistics
pub async fn get_session_status(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.stats.borrow().clone();
    (StatusCode::OK, Json(stats))
}

/// POST /session/stop
/// Ask the running session to stop (same path as an operator interrupt)
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.stats.borrow().clone();

    let message = if state.shutdown.is_cancelled() {
        "Stop already requested".to_string()
    } else {
        info!("Stop requested over HTTP for session {}", stats.session_id);
        state.shutdown.cancel();
        "Stopping session".to_string()
    };

    (
        StatusCode::ACCEPTED,
        Json(StopSessionResponse {
            session_id: stats.session_id.clone(),
            status: "stopping".to_string(),
            message,
            stats,
        }),
    )
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
