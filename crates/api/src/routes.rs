//! Route definitions.

use crate::handlers;
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Routes served under `/api/v1`.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", delete(handlers::delete_session))
        .route("/sessions/{id}/recommend", post(handlers::recommend_pool))
        .route("/sessions/{id}/chat", post(handlers::chat))
        .route("/sessions/{id}/stream", get(handlers::stream_snapshot))
        .route("/pools/{address}/ranges", get(handlers::pool_ranges))
        .route("/balance/validate", post(handlers::validate_balance))
        .route("/positions/prepare", post(handlers::prepare_position))
}

/// Builds the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_document))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_document() -> impl axum::response::IntoResponse {
    (
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        crate::openapi::openapi_json(),
    )
}
