//! History CLI commands: show and clear an agent's conversation window.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use parley_types::agent::AgentId;
use parley_types::message::{Message, MessageRole};

use crate::state::AppState;

/// Print the window contents, oldest first.
pub async fn show_history(state: &AppState, id: AgentId, json: bool) -> Result<()> {
    let agent = state.get_agent(id).await?;
    let messages = state.chat_service.history(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {} ({} / {})",
        style("History for").bold(),
        style(&agent.name).cyan().bold(),
        messages.len(),
        state.window.max_length()
    );
    println!();

    if messages.is_empty() {
        println!("  {}", style("No previous conversation.").dim());
        println!();
        return Ok(());
    }

    print_messages(&agent.name, &messages);
    Ok(())
}

/// Remove every message in the window after confirmation.
pub async fn clear_history(state: &AppState, id: AgentId, force: bool, json: bool) -> Result<()> {
    let agent = state.get_agent(id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Clear the conversation history of '{}'?",
                style(&agent.name).yellow().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.chat_service.clear_history(id).await?;

    if json {
        println!("{}", serde_json::json!({"cleared": true, "id": id}));
    } else {
        println!("  {} History cleared for '{}'.", style("✓").green().bold(), agent.name);
    }

    Ok(())
}

/// Print messages with styled role labels, one per line.
pub(crate) fn print_messages(agent_name: &str, messages: &[Message]) {
    for msg in messages {
        let label = match msg.role {
            MessageRole::User => style("You".to_string()).green(),
            MessageRole::Assistant => style(agent_name.to_string()).cyan(),
            MessageRole::System => style("System".to_string()).dim(),
        };
        println!("  {} {}", label.bold(), msg.content);
    }
    println!();
}
