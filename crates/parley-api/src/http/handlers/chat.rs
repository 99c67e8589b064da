//! Chat turn handler for the REST API.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

/// Body of POST /api/v1/agents/{id}/chat. A missing message is treated as empty.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub message: String,
}

/// POST /api/v1/agents/{id}/chat - Run one chat turn and return the reply.
///
/// The user message is recorded before the completion call and the reply
/// after it, so a failed call leaves only the user turn in history.
pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ApiResponse<ChatReply>>, AppError> {
    let meta = RequestMeta::start();
    let agent_id = parse_agent_id(&id)?;

    let message = state
        .chat_service
        .send_message(agent_id, &body.message)
        .await?;

    debug!(agent_id = %agent_id, reply_len = message.len(), "Chat turn completed");

    Ok(Json(
        ApiResponse::success(ChatReply { message }, &meta)
            .with_link("history", format!("/api/v1/agents/{agent_id}/history")),
    ))
}
