use super::state::AppState;
use crate::session::ParticipantSummary;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub status: String,
    pub message: String,
    pub websocket_endpoint: String,
}

/// GET /
/// Service banner for clients looking for the socket endpoint
pub async fn root() -> impl IntoResponse {
    Json(ServiceStatus {
        status: "ok".to_string(),
        message: "Babel relay WebSocket backend is running".to_string(),
        websocket_endpoint: "/conversation".to_string(),
    })
}

/// GET /participants
/// Participants currently registered in the session
pub async fn list_participants(State(state): State<AppState>) -> impl IntoResponse {
    let mut participants: Vec<ParticipantSummary> = state
        .registry
        .snapshot()
        .await
        .iter()
        .map(|participant| participant.summary())
        .collect();
    participants.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));

    (StatusCode::OK, Json(participants))
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
