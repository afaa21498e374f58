//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use parlor_shared::time::timestamp_to_jst_rfc3339;

use crate::{infrastructure::dto::http::StatsDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current registry occupancy
pub async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsDto> {
    Json(StatsDto {
        connections: state.connections.len().await,
        online_users: state.sessions.len().await,
        groups: state.groups.len().await,
        started_at: timestamp_to_jst_rfc3339(state.started_at),
    })
}
