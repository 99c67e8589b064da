//! SQLite agent repository implementation.
//!
//! Implements `AgentRepository` from `parley-core` over the `agents` table.
//! The `type` and `context` columns hold the agent type and system prompt.

use sqlx::Row;

use parley_core::repository::agent::AgentRepository;
use parley_types::agent::{Agent, AgentId, CreateAgentRequest};
use parley_types::error::RepositoryError;

use super::history::{format_datetime, now, parse_datetime};
use super::pool::DatabasePool;

/// SQLite-backed implementation of `AgentRepository`.
pub struct SqliteAgentRepository {
    pool: DatabasePool,
}

impl SqliteAgentRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AgentRow {
    id: i64,
    name: String,
    description: String,
    agent_type: String,
    context: String,
    created_at: String,
}

impl AgentRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            agent_type: row.try_get("type")?,
            context: row.try_get("context")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_agent(self) -> Result<Agent, RepositoryError> {
        Ok(Agent {
            id: AgentId(self.id),
            name: self.name,
            description: self.description,
            agent_type: self.agent_type,
            system_prompt: self.context,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AgentRepository for SqliteAgentRepository {
    async fn create(&self, request: &CreateAgentRequest) -> Result<Agent, RepositoryError> {
        let created_at = now();
        let description = request.description.clone().unwrap_or_default();
        let agent_type = request
            .agent_type
            .clone()
            .unwrap_or_else(|| Agent::DEFAULT_TYPE.to_string());
        let system_prompt = request.system_prompt.clone().unwrap_or_default();

        let result = sqlx::query(
            r#"INSERT INTO agents (name, description, type, context, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(&request.name)
        .bind(&description)
        .bind(&agent_type)
        .bind(&system_prompt)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(Agent {
            id: AgentId(result.last_insert_rowid()),
            name: request.name.clone(),
            description,
            agent_type,
            system_prompt,
            created_at,
        })
    }

    async fn get(&self, id: AgentId) -> Result<Option<Agent>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agents WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = AgentRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_agent()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Agent>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM agents ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut agents = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = AgentRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            agents.push(r.into_agent()?);
        }
        Ok(agents)
    }

    async fn delete(&self, id: AgentId) -> Result<(), RepositoryError> {
        // chat_history rows go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM agents WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parley_core::repository::history::HistoryRepository;
    use parley_types::message::MessageRole;

    use super::*;
    use crate::sqlite::history::SqliteHistoryRepository;
    use crate::sqlite::test_pool;

    #[tokio::test]
    async fn test_create_and_get_agent() {
        let repo = SqliteAgentRepository::new(test_pool().await);

        let request = CreateAgentRequest {
            name: "Eko".to_string(),
            description: Some("A tea sommelier".to_string()),
            agent_type: None,
            system_prompt: Some("Recommend teas.".to_string()),
        };
        let created = repo.create(&request).await.unwrap();
        assert_eq!(created.agent_type, "openai");

        let fetched = repo.get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Eko");
        assert_eq!(fetched.description, "A tea sommelier");
        assert_eq!(fetched.system_prompt, "Recommend teas.");
        assert_eq!(fetched.agent_type, "openai");
        assert_eq!(fetched.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_get_unknown_agent() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        assert!(repo.get(AgentId(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_agents_in_creation_order() {
        let repo = SqliteAgentRepository::new(test_pool().await);
        repo.create(&CreateAgentRequest::console_default()).await.unwrap();
        repo.create(&CreateAgentRequest::named("Eko")).await.unwrap();

        let agents = repo.list().await.unwrap();
        let names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Console Agent", "Eko"]);
    }

    #[tokio::test]
    async fn test_delete_agent_cascades_history() {
        let pool = test_pool().await;
        let repo = SqliteAgentRepository::new(pool.clone());
        let history = SqliteHistoryRepository::new(pool);

        let agent = repo.create(&CreateAgentRequest::named("Eko")).await.unwrap();
        history.append(agent.id, MessageRole::User, "hi").await.unwrap();

        repo.delete(agent.id).await.unwrap();
        assert!(repo.get(agent.id).await.unwrap().is_none());
        assert!(history.list_ordered(agent.id).await.unwrap().is_empty());

        let err = repo.delete(agent.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
