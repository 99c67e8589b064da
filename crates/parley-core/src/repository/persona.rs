//! Persona source trait definition.

use parley_types::error::PersonaError;
use parley_types::persona::Persona;

/// Read access to authored personas, looked up by agent name.
///
/// Returns `PersonaError::NotFound` when no persona exists for the name.
pub trait PersonaSource: Send + Sync {
    fn get_persona(
        &self,
        agent_name: &str,
    ) -> impl std::future::Future<Output = Result<Persona, PersonaError>> + Send;
}
