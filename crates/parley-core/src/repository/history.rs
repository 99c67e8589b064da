//! Message store trait definition.
//!
//! The message store is a durable append-only log of role/content pairs keyed
//! by agent. The history window (`chat::window`) layers the size bound on top.

use parley_types::agent::AgentId;
use parley_types::error::RepositoryError;
use parley_types::message::{HistoryRecord, MessageRole};

/// Repository trait for per-agent chat history.
///
/// Implementations live in parley-infra (e.g., `SqliteHistoryRepository`).
/// Uses native async fn in traits (Rust 2024 edition, no async_trait macro).
pub trait HistoryRepository: Send + Sync {
    /// Insert one message with a creation sequence strictly greater than any
    /// existing message. On error nothing was written.
    fn append(
        &self,
        agent_id: AgentId,
        role: MessageRole,
        content: &str,
    ) -> impl std::future::Future<Output = Result<HistoryRecord, RepositoryError>> + Send;

    /// All messages for the agent, oldest first. Empty when there is no history.
    fn list_ordered(
        &self,
        agent_id: AgentId,
    ) -> impl std::future::Future<Output = Result<Vec<HistoryRecord>, RepositoryError>> + Send;

    /// Delete everything except the `keep` most recent messages.
    ///
    /// Returns the number of messages removed.
    fn trim(
        &self,
        agent_id: AgentId,
        keep: usize,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;

    /// Delete every message for the agent. Succeeds on an empty history.
    fn delete_all(
        &self,
        agent_id: AgentId,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
