//! Agent CRUD handlers for the REST API.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use parley_types::agent::{Agent, CreateAgentRequest};

use super::parse_agent_id;
use crate::http::error::AppError;
use crate::http::response::{ApiResponse, RequestMeta};
use crate::state::AppState;

/// POST /api/v1/agents - Create a new agent.
pub async fn create_agent(
    State(state): State<AppState>,
    Json(body): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Agent>>), AppError> {
    let meta = RequestMeta::start();

    let agent = state.create_agent(body).await?;
    let id = agent.id;

    let resp = ApiResponse::success(agent, &meta)
        .with_link("self", format!("/api/v1/agents/{id}"))
        .with_link("chat", format!("/api/v1/agents/{id}/chat"))
        .with_link("history", format!("/api/v1/agents/{id}/history"));

    Ok((StatusCode::CREATED, Json(resp)))
}

/// GET /api/v1/agents - List all agents.
pub async fn list_agents(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Agent>>>, AppError> {
    let meta = RequestMeta::start();
    let agents = state.list_agents().await?;
    Ok(Json(ApiResponse::success(agents, &meta)))
}

/// GET /api/v1/agents/{id} - Get a single agent.
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Agent>>, AppError> {
    let meta = RequestMeta::start();
    let agent_id = parse_agent_id(&id)?;

    let agent = state.get_agent(agent_id).await?;

    Ok(Json(
        ApiResponse::success(agent, &meta)
            .with_link("self", format!("/api/v1/agents/{agent_id}"))
            .with_link("history", format!("/api/v1/agents/{agent_id}/history")),
    ))
}

/// DELETE /api/v1/agents/{id} - Delete an agent and its history.
pub async fn delete_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let meta = RequestMeta::start();
    let agent_id = parse_agent_id(&id)?;

    state.delete_agent(agent_id).await?;

    Ok(Json(ApiResponse::success(
        serde_json::json!({ "deleted": true, "id": agent_id }),
        &meta,
    )))
}
