//! Axum router configuration with middleware.
//!
//! Middleware: CORS (open), request tracing.
//!
//! When the configured web directory exists, `GET /` serves its
//! `index.html` and unknown paths fall through to its static files.
//! Otherwise only the API routes are served.

use axum::Router;
use axum::routing::{get, get_service, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let web_dir = state.config.server.web_dir.clone();
    let index_path = web_dir.join("index.html");

    let root = if index_path.exists() {
        tracing::info!(path = %web_dir.display(), "Static file serving enabled");
        get_service(ServeFile::new(index_path)).post(handlers::generate::generate_json)
    } else {
        post(handlers::generate::generate_json)
    };

    let mut router = Router::new()
        .route("/", root)
        .route(
            "/generate",
            get(handlers::generate::generate_fragment).post(handlers::generate::generate_json),
        )
        .route("/try", get(handlers::generate::try_demo))
        .route("/reset", post(handlers::document::reset_document))
        .route(
            "/download_file/{filename}",
            get(handlers::document::download_file),
        )
        .route("/sessions", get(handlers::session::list_sessions))
        .route("/sessions/{id}/turns", get(handlers::session::get_turns))
        .route(
            "/sessions/{id}",
            axum::routing::delete(handlers::session::delete_session),
        )
        .route("/health", get(health_check));

    if web_dir.is_dir() {
        router = router.fallback_service(ServeDir::new(&web_dir));
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
