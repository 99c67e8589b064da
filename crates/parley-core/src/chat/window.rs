//! Bounded per-agent conversation window.
//!
//! `HistoryWindow` wraps a [`HistoryRepository`] with a fixed maximum length.
//! Every append is followed by a trim that evicts the oldest messages beyond
//! the bound, so an agent's history never grows past `max_length` for longer
//! than one call.
//!
//! Calls for one agent must be serialized by the caller. Two concurrent
//! append-then-trim cycles for the same agent each compute their eviction set
//! against a moving history.

use tracing::{debug, warn};

use parley_types::agent::AgentId;
use parley_types::error::ChatError;
use parley_types::message::{HistoryRecord, Message, MessageRole};

use crate::repository::history::HistoryRepository;

/// Window manager over a message store. One instance serves every agent.
pub struct HistoryWindow<R: HistoryRepository> {
    repo: R,
    max_length: usize,
}

impl<R: HistoryRepository> HistoryWindow<R> {
    /// Create a window manager. A `max_length` of 0 retains nothing.
    pub fn new(repo: R, max_length: usize) -> Self {
        Self { repo, max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Access the underlying message store.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Append a message, then trim the agent's history to the window.
    ///
    /// An append failure is returned and no trim is attempted. A trim failure
    /// is logged and swallowed: the new message is already durable and an
    /// over-long window is corrected by the next successful trim.
    pub async fn add_message(
        &self,
        agent_id: AgentId,
        role: MessageRole,
        content: &str,
    ) -> Result<HistoryRecord, ChatError> {
        let record = self
            .repo
            .append(agent_id, role, content)
            .await
            .map_err(|e| {
                warn!(agent_id = %agent_id, role = %role, error = %e, "Failed to append chat message");
                ChatError::Storage(e.to_string())
            })?;

        match self.repo.trim(agent_id, self.max_length).await {
            Ok(0) => {}
            Ok(removed) => {
                debug!(agent_id = %agent_id, removed, max_length = self.max_length, "Trimmed chat history");
            }
            Err(e) => {
                warn!(agent_id = %agent_id, error = %e, "Failed to trim chat history");
            }
        }

        Ok(record)
    }

    /// Current window content, oldest first.
    pub async fn get_history(&self, agent_id: AgentId) -> Result<Vec<Message>, ChatError> {
        let records = self
            .repo
            .list_ordered(agent_id)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        Ok(records.into_iter().map(Message::from).collect())
    }

    /// Remove every message for the agent.
    pub async fn clear_history(&self, agent_id: AgentId) -> Result<(), ChatError> {
        let removed = self
            .repo
            .delete_all(agent_id)
            .await
            .map_err(|e| ChatError::Storage(e.to_string()))?;

        debug!(agent_id = %agent_id, removed, "Cleared chat history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::MemoryHistory;

    const AGENT: AgentId = AgentId(1);

    #[tokio::test]
    async fn test_history_keeps_last_m_in_order() {
        for (appends, bound) in [(0usize, 3usize), (2, 3), (3, 3), (7, 3), (12, 10), (5, 1)] {
            let window = HistoryWindow::new(MemoryHistory::new(), bound);
            for i in 0..appends {
                window
                    .add_message(AGENT, MessageRole::User, &format!("m{i}"))
                    .await
                    .unwrap();
            }

            let history = window.get_history(AGENT).await.unwrap();
            let expected: Vec<String> = (0..appends)
                .skip(appends.saturating_sub(bound))
                .map(|i| format!("m{i}"))
                .collect();
            let contents: Vec<String> = history.into_iter().map(|m| m.content).collect();

            assert_eq!(contents.len(), appends.min(bound));
            assert_eq!(contents, expected, "appends={appends} bound={bound}");
        }
    }

    #[tokio::test]
    async fn test_window_of_two_evicts_oldest() {
        let window = HistoryWindow::new(MemoryHistory::new(), 2);
        window.add_message(AGENT, MessageRole::User, "a").await.unwrap();
        window.add_message(AGENT, MessageRole::Assistant, "b").await.unwrap();
        window.add_message(AGENT, MessageRole::User, "c").await.unwrap();

        let history = window.get_history(AGENT).await.unwrap();
        assert_eq!(history, vec![Message::assistant("b"), Message::user("c")]);
    }

    #[tokio::test]
    async fn test_zero_length_window_retains_nothing() {
        let window = HistoryWindow::new(MemoryHistory::new(), 0);
        let record = window.add_message(AGENT, MessageRole::User, "hi").await.unwrap();

        assert_eq!(record.content, "hi");
        assert!(window.get_history(AGENT).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_windows_are_scoped_per_agent() {
        let window = HistoryWindow::new(MemoryHistory::new(), 2);
        for i in 0..3 {
            window.add_message(AgentId(1), MessageRole::User, &format!("one-{i}")).await.unwrap();
        }
        window.add_message(AgentId(2), MessageRole::User, "two-0").await.unwrap();

        assert_eq!(window.get_history(AgentId(1)).await.unwrap().len(), 2);
        assert_eq!(
            window.get_history(AgentId(2)).await.unwrap(),
            vec![Message::user("two-0")]
        );
    }

    #[tokio::test]
    async fn test_clear_history_empties_window() {
        let window = HistoryWindow::new(MemoryHistory::new(), 5);
        window.add_message(AGENT, MessageRole::User, "a").await.unwrap();
        window.add_message(AGENT, MessageRole::Assistant, "b").await.unwrap();

        window.clear_history(AGENT).await.unwrap();
        assert!(window.get_history(AGENT).await.unwrap().is_empty());

        // Clearing an already-empty history succeeds.
        window.clear_history(AGENT).await.unwrap();
        window.clear_history(AgentId(99)).await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_history_is_not_an_error() {
        let window = HistoryWindow::new(MemoryHistory::new(), 5);
        assert!(window.get_history(AgentId(404)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trim_failure_does_not_fail_append() {
        let repo = MemoryHistory::new();
        repo.fail_trim.store(true, Ordering::SeqCst);
        let window = HistoryWindow::new(repo, 1);

        window.add_message(AGENT, MessageRole::User, "a").await.unwrap();
        window.add_message(AGENT, MessageRole::User, "b").await.unwrap();

        // Window is temporarily over-long but nothing was lost.
        assert_eq!(window.repo().count(AGENT), 2);

        window.repo().fail_trim.store(false, Ordering::SeqCst);
        window.add_message(AGENT, MessageRole::User, "c").await.unwrap();
        assert_eq!(window.get_history(AGENT).await.unwrap(), vec![Message::user("c")]);
    }

    #[tokio::test]
    async fn test_append_failure_skips_trim() {
        let repo = MemoryHistory::new();
        repo.fail_append.store(true, Ordering::SeqCst);
        let window = HistoryWindow::new(repo, 3);

        let err = window
            .add_message(AGENT, MessageRole::User, "lost")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Storage(ref m) if m.contains("disk I/O")));
        assert_eq!(window.repo().trim_calls.load(Ordering::SeqCst), 0);
        assert_eq!(window.repo().count(AGENT), 0);
    }
}
