//! REST API request handlers.

pub mod agent;
pub mod chat;
pub mod history;

use parley_types::agent::AgentId;

use crate::http::error::AppError;

/// Parse the `{id}` path segment into an [`AgentId`].
pub(crate) fn parse_agent_id(raw: &str) -> Result<AgentId, AppError> {
    raw.parse::<AgentId>()
        .map_err(|_| AppError::Validation(format!("invalid agent id '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_agent_id() {
        assert_eq!(parse_agent_id("42").unwrap(), AgentId(42));
        assert!(matches!(parse_agent_id("abc"), Err(AppError::Validation(_))));
        assert!(matches!(parse_agent_id(""), Err(AppError::Validation(_))));
    }
}
