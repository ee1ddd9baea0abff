//! Document handlers.
//!
//! Endpoints:
//! - POST /reset                    - restore the starting template
//! - GET  /download_file/{filename} - download the persisted document

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DownloadQuery {
    /// Session whose latest fragment is used in rebuild mode.
    pub session: Option<String>,
}

/// POST /reset - overwrite the document with the starting template.
pub async fn reset_document(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.service.reset_document().await?;
    Ok(Json(json!({ "status": "reset" })))
}

/// GET /download_file/{filename} - the persisted document as an attachment.
///
/// Only the document's own file name is served; anything else is 404.
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    Query(query): Query<DownloadQuery>,
) -> Result<impl IntoResponse, AppError> {
    let store = state.service.store();
    let Some(file_name) = store.file_name().filter(|name| *name == filename) else {
        return Err(AppError::NotFound(format!("File '{filename}' not found")));
    };
    let disposition = format!("attachment; filename=\"{file_name}\"");

    let html = state
        .service
        .prepare_download(query.session.as_deref())
        .await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        html,
    ))
}
