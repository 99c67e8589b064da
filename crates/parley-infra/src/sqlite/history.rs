//! SQLite chat history repository implementation.
//!
//! Implements `HistoryRepository` from `parley-core` over the `chat_history`
//! table. Rows are ordered by the autoincrement `id`, which only grows, so
//! creation order survives wall-clock adjustments; `created_at` is recorded
//! for display only.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::Row;

use parley_core::repository::history::HistoryRepository;
use parley_types::agent::AgentId;
use parley_types::error::RepositoryError;
use parley_types::message::{HistoryRecord, MessageRole};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `HistoryRepository`.
pub struct SqliteHistoryRepository {
    pool: DatabasePool,
}

impl SqliteHistoryRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct HistoryRow {
    id: i64,
    agent_id: i64,
    role: String,
    content: String,
    created_at: String,
}

impl HistoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            agent_id: row.try_get("agent_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_record(self) -> Result<HistoryRecord, RepositoryError> {
        let role = self
            .role
            .parse::<MessageRole>()
            .map_err(RepositoryError::Query)?;

        Ok(HistoryRecord {
            id: self.id,
            agent_id: AgentId(self.agent_id),
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

pub(crate) fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Current time at the precision stored in the database.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 so stored timestamps sort lexicographically.
pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl HistoryRepository for SqliteHistoryRepository {
    async fn append(
        &self,
        agent_id: AgentId,
        role: MessageRole,
        content: &str,
    ) -> Result<HistoryRecord, RepositoryError> {
        let created_at = now();

        let result = sqlx::query(
            "INSERT INTO chat_history (agent_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(agent_id.0)
        .bind(role.to_string())
        .bind(content)
        .bind(format_datetime(&created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(HistoryRecord {
            id: result.last_insert_rowid(),
            agent_id,
            role,
            content: content.to_string(),
            created_at,
        })
    }

    async fn list_ordered(&self, agent_id: AgentId) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT id, agent_id, role, content, created_at
               FROM chat_history
               WHERE agent_id = ?
               ORDER BY id ASC"#,
        )
        .bind(agent_id.0)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = HistoryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            records.push(r.into_record()?);
        }
        Ok(records)
    }

    async fn trim(&self, agent_id: AgentId, keep: usize) -> Result<u64, RepositoryError> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);

        // LIMIT -1 is SQLite for "no limit"; OFFSET requires a LIMIT clause.
        let result = sqlx::query(
            r#"DELETE FROM chat_history
               WHERE id IN (
                   SELECT id FROM chat_history
                   WHERE agent_id = ?
                   ORDER BY id DESC
                   LIMIT -1 OFFSET ?
               )"#,
        )
        .bind(agent_id.0)
        .bind(keep)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self, agent_id: AgentId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM chat_history WHERE agent_id = ?")
            .bind(agent_id.0)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
