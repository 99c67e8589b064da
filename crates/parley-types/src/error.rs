use thiserror::Error;

use crate::llm::LlmError;

/// Errors from repository operations (used by trait definitions in parley-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors related to persona lookup.
#[derive(Debug, Error)]
pub enum PersonaError {
    #[error("persona '{0}' not found")]
    NotFound(String),

    #[error("invalid persona: {0}")]
    Invalid(String),

    #[error("persona io error: {0}")]
    Io(String),
}

/// Errors surfaced by a chat turn or a history operation.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or empty required input. Raised before any store or network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// Append or query failure in the message store.
    #[error("storage error: {0}")]
    Storage(String),

    /// Unknown agent or persona.
    #[error("not found: {0}")]
    NotFound(String),

    /// Transport, empty-response, or encoding failure from the completion client.
    #[error(transparent)]
    Completion(#[from] LlmError),
}

impl From<RepositoryError> for ChatError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => ChatError::NotFound("entity not found".to_string()),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

impl From<PersonaError> for ChatError {
    fn from(e: PersonaError) -> Self {
        match e {
            PersonaError::NotFound(name) => ChatError::NotFound(format!("persona '{name}'")),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_repository_error_maps_to_storage() {
        let err: ChatError = RepositoryError::Query("disk full".to_string()).into();
        assert!(matches!(err, ChatError::Storage(ref m) if m.contains("disk full")));
    }

    #[test]
    fn test_persona_not_found_maps_to_not_found() {
        let err: ChatError = PersonaError::NotFound("Eko".to_string()).into();
        assert!(matches!(err, ChatError::NotFound(ref m) if m.contains("Eko")));
    }

    #[test]
    fn test_completion_error_is_transparent() {
        let err: ChatError = LlmError::EmptyResponse.into();
        assert_eq!(err.to_string(), LlmError::EmptyResponse.to_string());
    }
}
