//! Persona value object consumed by the prompt template renderer.
//!
//! A persona is authored outside Parley (a JSON or YAML character file) and
//! treated as read-only. Sequence fields keep the order they were written in.

use serde::{Deserialize, Serialize};

use crate::agent::Agent;

/// Descriptive and stylistic attributes used to render an agent's context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "system", alias = "specialty")]
    pub system_prompt: String,
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub lore: Vec<String>,
    #[serde(default)]
    pub knowledge: Vec<String>,
    #[serde(default)]
    pub style: Vec<String>,
    #[serde(default)]
    pub adjectives: Vec<String>,
    #[serde(default)]
    pub instructions: String,
}

impl Persona {
    /// Minimal persona carrying only what the agent record knows about itself.
    pub fn from_agent(agent: &Agent) -> Self {
        Self {
            name: agent.name.clone(),
            description: agent.description.clone(),
            system_prompt: agent.system_prompt.clone(),
            ..Default::default()
        }
    }
}
