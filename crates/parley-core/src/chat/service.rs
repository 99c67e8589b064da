//! Chat service running one conversation turn end to end.
//!
//! ChatService coordinates the agent store, the persona source, the shared
//! history window, the prompt template, and the completion client. The user
//! turn is recorded before the remote call, so a failed call never loses the
//! user's input; the assistant reply is recorded only after a successful call.

use std::sync::Arc;

use tracing::{debug, info, warn};

use parley_types::agent::{Agent, AgentId};
use parley_types::config::{DEFAULT_SYSTEM_PROMPT, SystemPromptPolicy};
use parley_types::error::{ChatError, PersonaError};
use parley_types::message::{Message, MessageRole};
use parley_types::persona::Persona;

use crate::chat::window::HistoryWindow;
use crate::llm::assemble::converse;
use crate::llm::client::CompletionClient;
use crate::prompt::template::{PromptTemplate, format_history};
use crate::repository::agent::AgentRepository;
use crate::repository::history::HistoryRepository;
use crate::repository::persona::PersonaSource;

/// Orchestrates a chat turn for any agent.
///
/// Generic over the storage, persona, and client ports to maintain clean
/// architecture (parley-core never depends on parley-infra).
pub struct ChatService<H, A, P, C>
where
    H: HistoryRepository,
    A: AgentRepository,
    P: PersonaSource,
    C: CompletionClient,
{
    window: Arc<HistoryWindow<H>>,
    agents: A,
    personas: P,
    client: C,
    template: PromptTemplate,
    policy: SystemPromptPolicy,
    system_prompt: String,
    persona_fallback: bool,
}

impl<H, A, P, C> ChatService<H, A, P, C>
where
    H: HistoryRepository,
    A: AgentRepository,
    P: PersonaSource,
    C: CompletionClient,
{
    /// Create a chat service with the built-in template, the leading
    /// system-prompt policy, and persona fallback enabled.
    pub fn new(window: Arc<HistoryWindow<H>>, agents: A, personas: P, client: C) -> Self {
        Self {
            window,
            agents,
            personas,
            client,
            template: PromptTemplate::default(),
            policy: SystemPromptPolicy::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            persona_fallback: true,
        }
    }

    pub fn with_template(mut self, template: PromptTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn with_policy(mut self, policy: SystemPromptPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// When enabled, agents without an authored persona converse with one
    /// derived from their agent record instead of failing with `NotFound`.
    pub fn with_persona_fallback(mut self, enabled: bool) -> Self {
        self.persona_fallback = enabled;
        self
    }

    /// Access the shared history window.
    pub fn window(&self) -> &Arc<HistoryWindow<H>> {
        &self.window
    }

    /// Access the agent repository.
    pub fn agents(&self) -> &A {
        &self.agents
    }

    /// Access the completion client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run one chat turn and return the assistant's reply.
    ///
    /// Validation happens before any store or network access. If the
    /// completion call fails the error is returned and the user message
    /// stays in the window.
    pub async fn send_message(&self, agent_id: AgentId, message: &str) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("message is required".to_string()));
        }

        let agent = self.require_agent(agent_id).await?;
        let persona = self.resolve_persona(&agent).await?;

        self.window
            .add_message(agent_id, MessageRole::User, message)
            .await?;

        let history = self.window.get_history(agent_id).await?;
        let context = self.build_context(&persona, history, message);

        let reply = converse(
            &self.client,
            message,
            &context,
            self.policy,
            &self.system_prompt,
        )
        .await
        .inspect_err(|e| {
            warn!(agent_id = %agent_id, client = self.client.name(), error = %e, "Completion call failed");
        })?;

        self.window
            .add_message(agent_id, MessageRole::Assistant, &reply)
            .await?;

        info!(agent_id = %agent_id, reply_len = reply.len(), "Chat turn complete");
        Ok(reply)
    }

    /// Current window for an existing agent, oldest first.
    pub async fn history(&self, agent_id: AgentId) -> Result<Vec<Message>, ChatError> {
        self.require_agent(agent_id).await?;
        self.window.get_history(agent_id).await
    }

    /// Clear the window of an existing agent.
    pub async fn clear_history(&self, agent_id: AgentId) -> Result<(), ChatError> {
        self.require_agent(agent_id).await?;
        self.window.clear_history(agent_id).await
    }

    /// `[system: rendered persona, ...window]`. The pending user turn stays
    /// out of the rendered history text and is carried once, as the last
    /// window message.
    fn build_context(&self, persona: &Persona, history: Vec<Message>, message: &str) -> Vec<Message> {
        let prior = match history.split_last() {
            Some((last, prior)) if last.role == MessageRole::User && last.content == message => prior,
            _ => &history[..],
        };
        let rendered = self.template.render(persona, &format_history(prior));

        let mut context = Vec::with_capacity(history.len() + 1);
        context.push(Message::system(rendered));
        context.extend(history);
        context
    }

    async fn require_agent(&self, agent_id: AgentId) -> Result<Agent, ChatError> {
        self.agents
            .get(agent_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("agent {agent_id}")))
    }

    async fn resolve_persona(&self, agent: &Agent) -> Result<Persona, ChatError> {
        match self.personas.get_persona(&agent.name).await {
            Ok(persona) => Ok(persona),
            Err(PersonaError::NotFound(_)) if self.persona_fallback => {
                debug!(agent_id = %agent.id, name = %agent.name, "No persona file, deriving from agent record");
                Ok(Persona::from_agent(agent))
            }
            Err(e) => Err(e.into()),
        }
    }
}
