//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser editor posts its relation set to `/api/post_data` from another
//! origin, so every route sits behind a permissive CORS layer.

pub mod relations;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// All sink routes with CORS and request tracing applied.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/post_data", post(relations::post_data))
        .route("/api/relations", get(relations::latest))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
