//! CLI command definitions and dispatch for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. The CLI follows a
//! noun-verb pattern (e.g., `parley agent create`, `parley history show 1`).

pub mod agent;
pub mod chat;
pub mod history;

use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use parley_types::agent::AgentId;

/// Converse with persona-driven agents from the terminal or over HTTP.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive console chat.
    Chat {
        /// Agent to talk to. A new "Console Agent" is created when omitted.
        #[arg(short, long)]
        agent: Option<AgentId>,
    },

    /// Manage agents.
    Agent {
        #[command(subcommand)]
        action: AgentAction,
    },

    /// Inspect or clear an agent's conversation window.
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum AgentAction {
    /// Create a new agent (interactive when --name is omitted).
    Create {
        /// Agent name.
        #[arg(long)]
        name: Option<String>,

        /// Short description.
        #[arg(long)]
        description: Option<String>,

        /// Backend type recorded for the agent.
        #[arg(long = "type")]
        agent_type: Option<String>,

        /// Free-form system prompt stored with the agent.
        #[arg(long)]
        system_prompt: Option<String>,
    },

    /// List all agents.
    #[command(alias = "ls")]
    List,

    /// Show details of an agent.
    Show {
        /// Agent id.
        id: AgentId,
    },

    /// Delete an agent and its history.
    #[command(alias = "rm")]
    Delete {
        /// Agent id.
        id: AgentId,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Print the messages currently in the window.
    Show {
        /// Agent id.
        id: AgentId,
    },

    /// Remove every message in the window.
    Clear {
        /// Agent id.
        id: AgentId,

        /// Skip confirmation prompt.
        #[arg(long)]
        force: bool,
    },
}

/// Start a cyan spinner with `msg`, ticking until cleared.
pub(crate) fn spinner(msg: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
