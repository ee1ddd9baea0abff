//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - GET    /sessions            - List session ids
//! - GET    /sessions/{id}/turns - Turns of one session, oldest first
//! - DELETE /sessions/{id}       - Drop a session

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /sessions - List known session ids.
pub async fn list_sessions(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "sessions": state.service.conversations().session_ids() }))
}

/// GET /sessions/{id}/turns - Recorded turns of a session.
pub async fn get_turns(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let conversation = state
        .service
        .conversations()
        .get(&id)
        .ok_or_else(|| AppError::NotFound(format!("Session '{id}' not found")))?;

    Ok(Json(json!({
        "session": id,
        "turns": conversation.snapshot(),
    })))
}

/// DELETE /sessions/{id} - Forget a session's history.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.service.conversations().remove(&id) {
        tracing::debug!(session = %id, "Session removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session '{id}' not found")))
    }
}
