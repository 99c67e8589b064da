//! Global configuration types for Parley.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! history window, the completion endpoint, and prompt assembly.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// System prompt appended when the configuration does not provide one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in helping users with their tasks. \n\
You are knowledgeable, helpful, and precise in your responses. \n\
When users ask questions, provide clear and accurate information.\n\
If you're unsure about something, admit it rather than making assumptions.";

/// Where the default system prompt goes in the assembled message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemPromptPolicy {
    /// Appended after the new user turn as a second *user-role* message, and
    /// only when the user turn itself was appended.
    Legacy,
    /// A single system-role message at the start of the list, every call.
    #[default]
    Leading,
}

impl fmt::Display for SystemPromptPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemPromptPolicy::Legacy => write!(f, "legacy"),
            SystemPromptPolicy::Leading => write!(f, "leading"),
        }
    }
}

impl FromStr for SystemPromptPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "legacy" => Ok(SystemPromptPolicy::Legacy),
            "leading" => Ok(SystemPromptPolicy::Leading),
            other => Err(format!("invalid system prompt policy: '{other}'")),
        }
    }
}

/// Top-level configuration for Parley.
///
/// Loaded from `~/.parley/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Number of most recent messages kept per agent. `0` keeps nothing.
    #[serde(default = "default_max_history_length")]
    pub max_history_length: usize,

    /// Model identifier sent with every completion request.
    #[serde(default = "default_model")]
    pub model: String,

    /// Full URL of the chat-completion endpoint.
    #[serde(default = "default_completion_url")]
    pub completion_url: String,

    /// Upper bound for a single completion call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default)]
    pub system_prompt_policy: SystemPromptPolicy,

    /// Custom persona template; the built-in template is used when unset.
    #[serde(default)]
    pub template_path: Option<PathBuf>,

    /// Derive a persona from the agent record when no persona file exists.
    #[serde(default = "default_persona_fallback")]
    pub persona_fallback: bool,

    /// Bearer credential. `OPENAI_API_KEY` takes precedence when set.
    #[serde(default)]
    pub api_key: Option<String>,
}

fn default_max_history_length() -> usize {
    10
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_completion_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_persona_fallback() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            max_history_length: default_max_history_length(),
            model: default_model(),
            completion_url: default_completion_url(),
            request_timeout_secs: default_request_timeout_secs(),
            system_prompt: default_system_prompt(),
            system_prompt_policy: SystemPromptPolicy::default(),
            template_path: None,
            persona_fallback: default_persona_fallback(),
            api_key: None,
        }
    }
}
