//! Fragment generation handlers.
//!
//! Endpoints:
//! - GET  /generate  - htmx-style: prompt in the query, target in `HX-Target`
//! - POST /generate  - JSON body, JSON `{"html_code"}` response
//! - POST /          - alias of `POST /generate`
//! - GET  /try       - fixed demo prompt

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use serde::{Deserialize, Serialize};

use hxai_types::error::GenerationError;
use hxai_types::generation::GenerationRequest;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request header htmx uses to name the element being swapped.
pub const HX_TARGET_HEADER: &str = "hx-target";

/// Prompt used by `GET /try`.
pub const DEMO_PROMPT: &str = "Create a button with a red background and white text color.";

/// Query parameters of `GET /generate`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateQuery {
    pub prompt: Option<String>,
    /// Used when no `HX-Target` header is sent.
    pub target: Option<String>,
    /// Truthy (`1`, `true`, `yes`, `on`) to include the session's history.
    pub context: Option<String>,
    pub session: Option<String>,
}

/// Body of `POST /generate`.
#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub use_context: bool,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub html_code: String,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn require_prompt(prompt: Option<String>) -> Result<String, AppError> {
    non_blank(prompt)
        .ok_or_else(|| GenerationError::InvalidArgument("Prompt is required".to_string()).into())
}

fn build_request(
    prompt: String,
    target: Option<String>,
    use_context: bool,
    session: Option<String>,
) -> GenerationRequest {
    let mut request = GenerationRequest::new(prompt);
    if let Some(target) = target {
        request = request.with_target(target);
    }
    if use_context {
        request = request.with_context(non_blank(session));
    }
    request
}

/// GET /generate - generate a fragment and patch the targeted element.
pub async fn generate_fragment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<GenerateQuery>,
) -> Result<Html<String>, AppError> {
    let prompt = require_prompt(query.prompt)?;
    let header_target = headers
        .get(HX_TARGET_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let target = non_blank(header_target).or_else(|| non_blank(query.target));

    let request = build_request(
        prompt,
        target,
        is_truthy(query.context.as_deref()),
        query.session,
    );
    let outcome = state.service.generate(request).await?;
    Ok(Html(outcome.fragment))
}

/// POST /generate - generate a fragment from a JSON body.
pub async fn generate_json(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let prompt = require_prompt(body.prompt)?;
    let request = build_request(
        prompt,
        non_blank(body.target),
        body.use_context,
        body.session,
    );
    let outcome = state.service.generate(request).await?;
    Ok(Json(GenerateResponse {
        html_code: outcome.fragment,
    }))
}

/// GET /try - generate a fragment for the fixed demo prompt.
pub async fn try_demo(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let outcome = state
        .service
        .generate(GenerationRequest::new(DEMO_PROMPT))
        .await?;
    Ok(Html(outcome.fragment))
}
