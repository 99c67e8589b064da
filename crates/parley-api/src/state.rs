//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI and REST API.
//! The history window is built once here and shared by every caller path.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use parley_core::chat::service::ChatService;
use parley_core::chat::window::HistoryWindow;
use parley_core::repository::agent::AgentRepository;
use parley_infra::config::{API_KEY_ENV, load_global_config, load_template, resolve_api_key};
use parley_infra::filesystem::persona::FilePersonaStore;
use parley_infra::filesystem::resolve_data_dir;
use parley_infra::llm::openai::OpenAiCompletionClient;
use parley_infra::sqlite::agent::SqliteAgentRepository;
use parley_infra::sqlite::history::SqliteHistoryRepository;
use parley_infra::sqlite::pool::{DatabasePool, database_url};
use parley_types::agent::{Agent, AgentId, CreateAgentRequest};
use parley_types::config::GlobalConfig;
use parley_types::error::ChatError;
use parley_types::persona::Persona;

/// Concrete type aliases for the service generics pinned to infra implementations.
pub type ConcreteWindow = HistoryWindow<SqliteHistoryRepository>;

pub type ConcreteChatService = ChatService<
    SqliteHistoryRepository,
    SqliteAgentRepository,
    FilePersonaStore,
    OpenAiCompletionClient,
>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub window: Arc<ConcreteWindow>,
    pub personas: Arc<FilePersonaStore>,
    pub config: Arc<GlobalConfig>,
}

impl AppState {
    /// Initialize the application state in the resolved data directory.
    pub async fn init() -> anyhow::Result<Self> {
        Self::init_at(&resolve_data_dir()).await
    }

    /// Initialize the application state: load config, connect to DB, wire services.
    pub async fn init_at(data_dir: &Path) -> anyhow::Result<Self> {
        // Ensure data directory exists
        tokio::fs::create_dir_all(data_dir).await?;

        let config = load_global_config(data_dir).await;
        let db_pool = DatabasePool::new(&database_url(data_dir)).await?;

        let window = Arc::new(HistoryWindow::new(
            SqliteHistoryRepository::new(db_pool.clone()),
            config.max_history_length,
        ));

        let api_key = resolve_api_key(&config);
        if api_key.is_none() {
            warn!("No API key configured; set {API_KEY_ENV} or api_key in config.toml");
        }
        let client = OpenAiCompletionClient::from_config(&config, api_key)?;

        let template = load_template(&config, data_dir).await;

        let chat_service = ChatService::new(
            Arc::clone(&window),
            SqliteAgentRepository::new(db_pool.clone()),
            FilePersonaStore::new(data_dir),
            client,
        )
        .with_template(template)
        .with_policy(config.system_prompt_policy)
        .with_system_prompt(config.system_prompt.clone())
        .with_persona_fallback(config.persona_fallback);

        debug!(
            data_dir = %data_dir.display(),
            max_history_length = config.max_history_length,
            model = %config.model,
            "Application state initialized"
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            window,
            personas: Arc::new(FilePersonaStore::new(data_dir)),
            config: Arc::new(config),
        })
    }

    /// Whether a completion credential was resolved at startup.
    pub fn has_credential(&self) -> bool {
        self.chat_service.client().has_credential()
    }

    /// Create an agent and write a derived persona file if it has none.
    ///
    /// A failure to write the persona file is logged; the agent still
    /// converses through the persona fallback.
    pub async fn create_agent(&self, request: CreateAgentRequest) -> Result<Agent, ChatError> {
        if request.name.trim().is_empty() {
            return Err(ChatError::Validation("name is required".to_string()));
        }

        let agent = self.chat_service.agents().create(&request).await?;

        match self.personas.save_if_missing(&Persona::from_agent(&agent)).await {
            Ok(true) => debug!(agent_id = %agent.id, "Wrote derived persona file"),
            Ok(false) => {}
            Err(e) => warn!(agent_id = %agent.id, error = %e, "Failed to write persona file"),
        }

        Ok(agent)
    }

    pub async fn get_agent(&self, agent_id: AgentId) -> Result<Agent, ChatError> {
        self.chat_service
            .agents()
            .get(agent_id)
            .await?
            .ok_or_else(|| ChatError::NotFound(format!("agent {agent_id}")))
    }

    pub async fn list_agents(&self) -> Result<Vec<Agent>, ChatError> {
        Ok(self.chat_service.agents().list().await?)
    }

    /// Delete an agent; its history goes with it.
    pub async fn delete_agent(&self, agent_id: AgentId) -> Result<(), ChatError> {
        self.chat_service
            .agents()
            .delete(agent_id)
            .await
            .map_err(|e| match ChatError::from(e) {
                ChatError::NotFound(_) => ChatError::NotFound(format!("agent {agent_id}")),
                other => other,
            })
    }
}
