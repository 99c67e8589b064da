//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use parley_types::error::ChatError;
use parley_types::llm::LlmError;

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Errors surfaced by the chat service and agent store.
    Chat(ChatError),
    /// Malformed request input caught in the handler.
    Validation(String),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Validation(msg) | AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::NotFound(what)) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", format!("{what} not found"))
            }
            AppError::Chat(ChatError::Storage(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Completion(LlmError::MissingCredential)) => (
                StatusCode::BAD_GATEWAY,
                "MISSING_CREDENTIAL",
                LlmError::MissingCredential.to_string(),
            ),
            AppError::Chat(ChatError::Completion(e)) => {
                (StatusCode::BAD_GATEWAY, "COMPLETION_ERROR", e.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "Request failed");
        }

        let body = ApiResponse::error(code, message, uuid::Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}
