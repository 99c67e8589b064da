//! OpenAiCompletionClient -- concrete [`CompletionClient`] for OpenAI-compatible
//! chat-completion endpoints.
//!
//! Sends `{model, messages}` as JSON with a bearer credential and returns the
//! first choice's content. One attempt per call; no retries.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use parley_core::llm::client::CompletionClient;
use parley_types::config::GlobalConfig;
use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// OpenAI-compatible completion client.
///
/// Does NOT derive Debug: the API key is only exposed when building the
/// `Authorization` header. Without a key every call fails with
/// [`LlmError::MissingCredential`] before any network access.
pub struct OpenAiCompletionClient {
    client: reqwest::Client,
    api_key: Option<SecretString>,
    endpoint: String,
    model: String,
}

impl OpenAiCompletionClient {
    /// Create a client posting to `endpoint` with a per-request `timeout`.
    pub fn new(
        api_key: Option<SecretString>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Transport {
                status: None,
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            endpoint: endpoint.into(),
            model: model.into(),
        })
    }

    /// Create a client from the endpoint, model, and timeout in `config`.
    pub fn from_config(
        config: &GlobalConfig,
        api_key: Option<SecretString>,
    ) -> Result<Self, LlmError> {
        Self::new(
            api_key,
            config.completion_url.clone(),
            config.model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

impl CompletionClient for OpenAiCompletionClient {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let api_key = self.api_key.as_ref().ok_or(LlmError::MissingCredential)?;

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::Transport {
                status: e.status().map(|s| s.as_u16()),
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| LlmError::Transport {
            status: Some(status.as_u16()),
            message: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(LlmError::Transport {
                status: Some(status.as_u16()),
                message: format!("HTTP {status}: {body}"),
            });
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::Encoding(format!("failed to parse response: {e}")))?;

        debug!(model = %self.model, choices = parsed.choices.len(), "Completion response received");

        parsed
            .first_content()
            .map(str::to_string)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use parley_types::message::Message;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> OpenAiCompletionClient {
        OpenAiCompletionClient::new(
            Some(SecretString::from("sk-test".to_string())),
            format!("{}/v1/chat/completions", server.uri()),
            "gpt-3.5-turbo",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-3.5-turbo".to_string(),
            messages: vec![Message::system("persona"), Message::user("hello")],
        }
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_json(serde_json::json!({
                "model": "gpt-3.5-turbo",
                "messages": [
                    {"role": "system", "content": "persona"},
                    {"role": "user", "content": "hello"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [
                    {"index": 0, "message": {"role": "assistant", "content": "Hi!"}},
                    {"index": 1, "message": {"role": "assistant", "content": "Second"}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).complete(&request()).await.unwrap();
        assert_eq!(reply, "Hi!");
    }

    #[tokio::test]
    async fn test_server_error_surfaces_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        match &err {
            LlmError::Transport { status, message } => {
                assert_eq!(*status, Some(500));
                assert!(message.contains("rate limited"));
            }
            other => panic!("expected transport error, got {other:?}"),
        }
        assert!(err.to_string().contains("rate limited"));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_malformed_body_is_encoding_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = OpenAiCompletionClient::new(
            Some(SecretString::from("sk-test".to_string())),
            "http://127.0.0.1:1/v1/chat/completions",
            "gpt-3.5-turbo",
            Duration::from_secs(2),
        )
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Transport { status: None, .. }));
    }

    #[test]
    fn test_from_config() {
        let config = GlobalConfig::default();
        let client =
            OpenAiCompletionClient::from_config(&config, Some(SecretString::from("k".to_string())))
                .unwrap();
        assert_eq!(client.model(), "gpt-3.5-turbo");
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(client.name(), "openai");
        assert!(client.has_credential());
    }

    #[tokio::test]
    async fn test_missing_credential_skips_network() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = OpenAiCompletionClient::new(
            None,
            format!("{}/v1/chat/completions", server.uri()),
            "gpt-3.5-turbo",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = client.complete(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential));
    }
}
