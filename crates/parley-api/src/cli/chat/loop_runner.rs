//! Main chat loop orchestration.
//!
//! Resolves the agent (creating the default console agent when none is
//! given), prints the banner, then reads lines until `exit` or Ctrl+D.
//! Each line is one chat turn through the shared chat service.

use console::style;
use tracing::{info, warn};

use parley_core::llm::client::CompletionClient;
use parley_infra::config::API_KEY_ENV;
use parley_types::agent::{Agent, AgentId, CreateAgentRequest};

use crate::cli::history::print_messages;
use crate::cli::spinner;
use crate::state::AppState;

use super::banner::{print_missing_key_warning, print_welcome_banner};
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

/// Look up `agent_id`, or create the default console agent when `None`.
async fn resolve_agent(state: &AppState, agent_id: Option<AgentId>) -> anyhow::Result<Agent> {
    match agent_id {
        Some(id) => Ok(state.get_agent(id).await?),
        None => {
            let agent = state
                .create_agent(CreateAgentRequest::console_default())
                .await?;
            info!(agent_id = %agent.id, "Created console agent");
            Ok(agent)
        }
    }
}

/// Run the interactive chat loop.
pub async fn run_chat_loop(state: &AppState, agent_id: Option<AgentId>) -> anyhow::Result<()> {
    let agent = resolve_agent(state, agent_id).await?;
    let model = state.chat_service.client().model().to_string();

    print_welcome_banner(&agent.name, &agent.description, &model, &agent.id.to_string());
    if !state.has_credential() {
        print_missing_key_warning(API_KEY_ENV);
    }

    let prompt = format!("{} ", style(">").green().bold());
    let (mut chat_input, _writer) = ChatInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Eof => break,
            InputEvent::Interrupted => {
                println!("  {}", style("Press Ctrl+D or type 'exit' to quit.").dim());
                continue;
            }
            InputEvent::Message(text) => text,
        };

        if text.is_empty() {
            continue;
        }

        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Exit => break,
                ChatCommand::Help => commands::print_help(),
                ChatCommand::Clear => match state.chat_service.clear_history(agent.id).await {
                    Ok(()) => println!("  {} History cleared.", style("✓").green().bold()),
                    Err(e) => println!("  {} Failed to clear history: {e}", style("!").red().bold()),
                },
                ChatCommand::History => match state.chat_service.history(agent.id).await {
                    Ok(messages) if messages.is_empty() => {
                        println!("  {}", style("No previous conversation.").dim())
                    }
                    Ok(messages) => {
                        println!();
                        print_messages(&agent.name, &messages);
                    }
                    Err(e) => println!("  {} Failed to load history: {e}", style("!").red().bold()),
                },
                ChatCommand::Unknown(name) => println!(
                    "  {} Unknown command: {}. Type /help for available commands.",
                    style("?").yellow().bold(),
                    style(name).dim()
                ),
            }
            continue;
        }

        let spinner = spinner("thinking...");
        let result = state.chat_service.send_message(agent.id, &text).await;
        spinner.finish_and_clear();

        match result {
            Ok(reply) => {
                println!();
                println!("{reply}");
                println!();
            }
            Err(e) => {
                warn!(agent_id = %agent.id, error = %e, "Chat turn failed");
                println!("  {} {e}", style("Error:").red().bold());
            }
        }
    }

    chat_input.flush();
    println!("  {}", style("Session ended.").dim());
    Ok(())
}
