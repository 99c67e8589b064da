//! History window handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};

use parley_types::message::Message;

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

/// GET /api/v1/agents/{id}/history - Window contents, oldest first.
pub async fn get_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Message>>>, AppError> {
    let meta = RequestMeta::start();
    let agent_id = parse_agent_id(&id)?;

    let messages = state.chat_service.history(agent_id).await?;

    Ok(Json(
        ApiResponse::success(messages, &meta)
            .with_link("agent", format!("/api/v1/agents/{agent_id}")),
    ))
}

/// DELETE /api/v1/agents/{id}/history - Clear the window.
pub async fn clear_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let meta = RequestMeta::start();
    let agent_id = parse_agent_id(&id)?;

    state.chat_service.clear_history(agent_id).await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "cleared": true, "id": agent_id }),
        &meta,
    )))
}
