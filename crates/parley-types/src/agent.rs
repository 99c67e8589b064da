use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Integer identifier for an agent, assigned by the agent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(pub i64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AgentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A configured conversational agent.
///
/// Persisted in the `agents` table. `agent_type` names the backend the agent
/// was created for (e.g. "openai"); `system_prompt` is the free-form context
/// stored alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    pub system_prompt: String,
    pub created_at: DateTime<Utc>,
}

impl Agent {
    /// Name used for the agent created by the console when none is given.
    pub const DEFAULT_NAME: &'static str = "Console Agent";

    /// Backend type recorded for agents created without one.
    pub const DEFAULT_TYPE: &'static str = "openai";
}

/// Request to create a new agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, rename = "type")]
    pub agent_type: Option<String>,
    #[serde(default, alias = "context")]
    pub system_prompt: Option<String>,
}

impl CreateAgentRequest {
    /// Request with only a name; everything else takes store defaults.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            agent_type: None,
            system_prompt: None,
        }
    }

    /// The request the console uses for its default agent.
    pub fn console_default() -> Self {
        Self {
            name: Agent::DEFAULT_NAME.to_string(),
            description: None,
            agent_type: Some(Agent::DEFAULT_TYPE.to_string()),
            system_prompt: None,
        }
    }
}
