//! Agent repository trait definition.

use parley_types::agent::{Agent, AgentId, CreateAgentRequest};
use parley_types::error::RepositoryError;

/// Repository trait for agent persistence.
///
/// Implementations live in parley-infra (e.g., SqliteAgentRepository).
pub trait AgentRepository: Send + Sync {
    /// Create a new agent. The store assigns the id.
    fn create(
        &self,
        request: &CreateAgentRequest,
    ) -> impl std::future::Future<Output = Result<Agent, RepositoryError>> + Send;

    /// Get an agent by id.
    fn get(
        &self,
        id: AgentId,
    ) -> impl std::future::Future<Output = Result<Option<Agent>, RepositoryError>> + Send;

    /// List all agents, oldest first.
    fn list(&self) -> impl std::future::Future<Output = Result<Vec<Agent>, RepositoryError>> + Send;

    /// Delete an agent and its history. Returns `NotFound` if it did not exist.
    fn delete(
        &self,
        id: AgentId,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
