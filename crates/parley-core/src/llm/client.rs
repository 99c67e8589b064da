//! CompletionClient trait definition.

use parley_types::llm::{CompletionRequest, LlmError};

/// Trait for chat-completion endpoint clients.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `OpenAiCompletionClient`).
pub trait CompletionClient: Send + Sync {
    /// Human-readable client name (e.g., "openai").
    fn name(&self) -> &str;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Send a completion request and return the first choice's text.
    ///
    /// A single attempt is made; failures are returned as-is.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<String, LlmError>> + Send;
}
