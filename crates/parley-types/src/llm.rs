//! Completion endpoint request/response types for Parley.
//!
//! These model the chat-completion wire shapes: a request is
//! `{model, messages}` and a response is `{choices: [{message: {content}}]}`.
//! Extra response fields are ignored.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// Request body sent to the completion endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

/// Response body returned by the completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<Choice>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

/// The message payload of a completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

impl CompletionResponse {
    /// Content of the first choice, if any.
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

/// Errors from completion endpoint operations.
///
/// None of these are retried; they are surfaced to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// Network failure or non-2xx status. `message` carries the raw response
    /// body when one was received.
    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("empty response: completion returned no choices")]
    EmptyResponse,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("no API credential configured")]
    MissingCredential,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialize_shape() {
        let request = CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![Message::user("hello")],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [{"role": "user", "content": "hello"}]
            })
        );
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"hi"},"finish_reason":"stop"}]}"#;
        let resp: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.first_content(), Some("hi"));
    }

    #[test]
    fn test_response_without_choices() {
        let resp: CompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(resp.first_content().is_none());
    }

    #[test]
    fn test_transport_error_display_contains_body() {
        let err = LlmError::Transport {
            status: Some(500),
            message: "HTTP 500: rate limited".to_string(),
        };
        assert!(err.to_string().contains("rate limited"));
    }
}
