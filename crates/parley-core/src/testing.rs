//! In-memory test doubles for the core ports.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use chrono::Utc;

use parley_types::agent::{Agent, AgentId, CreateAgentRequest};
use parley_types::error::{PersonaError, RepositoryError};
use parley_types::llm::{CompletionRequest, LlmError};
use parley_types::message::{HistoryRecord, MessageRole};
use parley_types::persona::Persona;

use crate::llm::client::CompletionClient;
use crate::repository::agent::AgentRepository;
use crate::repository::history::HistoryRepository;
use crate::repository::persona::PersonaSource;

/// History store backed by a `Vec`, with switches to force failures.
#[derive(Default)]
pub struct MemoryHistory {
    records: Mutex<Vec<HistoryRecord>>,
    next_id: AtomicI64,
    pub fail_append: AtomicBool,
    pub fail_trim: AtomicBool,
    pub trim_calls: AtomicUsize,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, agent_id: AgentId) -> usize {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.agent_id == agent_id)
            .count()
    }
}

impl HistoryRepository for MemoryHistory {
    async fn append(
        &self,
        agent_id: AgentId,
        role: MessageRole,
        content: &str,
    ) -> Result<HistoryRecord, RepositoryError> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk I/O error".to_string()));
        }
        let record = HistoryRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            agent_id,
            role,
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }

    async fn list_ordered(&self, agent_id: AgentId) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let mut records: Vec<HistoryRecord> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.agent_id == agent_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.id);
        Ok(records)
    }

    async fn trim(&self, agent_id: AgentId, keep: usize) -> Result<u64, RepositoryError> {
        self.trim_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_trim.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("database is locked".to_string()));
        }
        let mut records = self.records.lock().unwrap();
        let mut ids: Vec<i64> = records
            .iter()
            .filter(|r| r.agent_id == agent_id)
            .map(|r| r.id)
            .collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        let evict: Vec<i64> = ids.into_iter().skip(keep).collect();
        records.retain(|r| !(r.agent_id == agent_id && evict.contains(&r.id)));
        Ok(evict.len() as u64)
    }

    async fn delete_all(&self, agent_id: AgentId) -> Result<u64, RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| r.agent_id != agent_id);
        Ok((before - records.len()) as u64)
    }
}

/// Agent store backed by a `HashMap`.
#[derive(Default)]
pub struct MemoryAgents {
    agents: Mutex<HashMap<AgentId, Agent>>,
    next_id: AtomicI64,
}

impl MemoryAgents {
    pub fn with_agent(name: &str) -> (Self, AgentId) {
        let store = Self::default();
        let id = AgentId(store.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        store.agents.lock().unwrap().insert(
            id,
            Agent {
                id,
                name: name.to_string(),
                description: format!("{name} test agent"),
                agent_type: "openai".to_string(),
                system_prompt: String::new(),
                created_at: Utc::now(),
            },
        );
        (store, id)
    }
}

impl AgentRepository for MemoryAgents {
    async fn create(&self, request: &CreateAgentRequest) -> Result<Agent, RepositoryError> {
        let id = AgentId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let agent = Agent {
            id,
            name: request.name.clone(),
            description: request.description.clone().unwrap_or_default(),
            agent_type: request.agent_type.clone().unwrap_or_default(),
            system_prompt: request.system_prompt.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        self.agents.lock().unwrap().insert(id, agent.clone());
        Ok(agent)
    }

    async fn get(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        Ok(self.agents.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Agent>, RepositoryError> {
        let mut agents: Vec<Agent> = self.agents.lock().unwrap().values().cloned().collect();
        agents.sort_by_key(|a| a.id);
        Ok(agents)
    }

    async fn delete(&self, id: AgentId) -> Result<(), RepositoryError> {
        self.agents
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

/// Persona source holding a fixed set of personas keyed by name.
#[derive(Default)]
pub struct StaticPersonas(pub Vec<Persona>);

impl PersonaSource for StaticPersonas {
    async fn get_persona(&self, agent_name: &str) -> Result<Persona, PersonaError> {
        self.0
            .iter()
            .find(|p| p.name == agent_name)
            .cloned()
            .ok_or_else(|| PersonaError::NotFound(agent_name.to_string()))
    }
}

/// What a [`MockClient`] returns from `complete`.
#[derive(Clone)]
pub enum MockReply {
    Text(String),
    Transport(String),
    Empty,
}

/// Completion client that records requests and returns a canned reply.
pub struct MockClient {
    reply: MockReply,
    pub requests: Mutex<Vec<CompletionRequest>>,
}

impl MockClient {
    pub fn new(reply: MockReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl CompletionClient for MockClient {
    fn name(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, LlmError>> + Send {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.reply.clone();
        async move {
            match reply {
                MockReply::Text(text) => Ok(text),
                MockReply::Transport(body) => Err(LlmError::Transport {
                    status: Some(500),
                    message: format!("HTTP 500: {body}"),
                }),
                MockReply::Empty => Err(LlmError::EmptyResponse),
            }
        }
    }
}
