//! Axum router configuration with middleware.
//!
//! Agent routes are under `/api/v1/`; `/health` sits at the root.
//! Middleware: CORS, request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Agent CRUD
        .route(
            "/agents",
            post(handlers::agent::create_agent).get(handlers::agent::list_agents),
        )
        .route(
            "/agents/{id}",
            get(handlers::agent::get_agent).delete(handlers::agent::delete_agent),
        )
        // Chat turn
        .route("/agents/{id}/chat", post(handlers::chat::send_message))
        // History window
        .route(
            "/agents/{id}/history",
            get(handlers::history::get_history).delete(handlers::history::clear_history),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Liveness check.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
