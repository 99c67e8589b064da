//! Agent lifecycle CLI commands: create, list, show, delete.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::{Confirm, Input};

use parley_infra::filesystem::persona::slugify;
use parley_types::agent::{Agent, AgentId, CreateAgentRequest};

use super::spinner;
use crate::state::AppState;

/// Create a new agent via interactive prompts or one-shot flags.
///
/// # Examples
///
/// ```bash
/// # Interactive
/// parley agent create
///
/// # One-shot with flags
/// parley agent create --name "Eko" --description "A tea sommelier"
/// ```
pub async fn create_agent(
    state: &AppState,
    name: Option<String>,
    description: Option<String>,
    agent_type: Option<String>,
    system_prompt: Option<String>,
    json: bool,
) -> Result<()> {
    let name = match name {
        Some(n) => n,
        None => Input::<String>::new()
            .with_prompt("Agent name")
            .interact_text()?,
    };

    let description = match description {
        Some(d) => d,
        None if json => String::new(),
        None => Input::<String>::new()
            .with_prompt("Short description")
            .default(format!("An agent named {name}"))
            .interact_text()?,
    };

    let spinner = spinner("Creating agent...");

    let request = CreateAgentRequest {
        name,
        description: Some(description),
        agent_type,
        system_prompt,
    };
    let result = state.create_agent(request).await;
    spinner.finish_and_clear();
    let agent = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
        return Ok(());
    }

    println!();
    println!("  {} Agent created successfully!", style("✓").green().bold());
    println!();
    println!("  {}  {}", style("Name:").bold(), style(&agent.name).cyan());
    println!("  {}    {}", style("ID:").bold(), agent.id);
    println!("  {}  {}", style("Type:").bold(), &agent.agent_type);
    println!();
    println!(
        "  Persona file: {}",
        style(state.personas.json_path(&agent.name).display()).dim()
    );
    println!(
        "  Start chatting: {}",
        style(format!("parley chat --agent {}", agent.id)).yellow()
    );
    println!();

    Ok(())
}

/// List all agents in a table.
pub async fn list_agents(state: &AppState, json: bool) -> Result<()> {
    let agents = state.list_agents().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
        return Ok(());
    }

    if agents.is_empty() {
        println!();
        println!("  {} No agents yet.", style("○").dim());
        println!(
            "  Create one with: {}",
            style("parley agent create").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Type").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
            Cell::new("Created").fg(Color::Cyan),
        ]);

    for agent in &agents {
        table.add_row(vec![
            Cell::new(agent.id),
            Cell::new(&agent.name),
            Cell::new(&agent.agent_type),
            Cell::new(truncate(&agent.description, 40)),
            Cell::new(agent.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {} agent{}",
        agents.len(),
        if agents.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Show full details for a single agent.
pub async fn show_agent(state: &AppState, id: AgentId, json: bool) -> Result<()> {
    let agent = state.get_agent(id).await?;
    let messages = state.window.get_history(id).await?;
    let persona_file = state.personas.find(&agent.name).await;

    if json {
        let value = serde_json::json!({
            "agent": agent,
            "history_length": messages.len(),
            "max_history_length": state.window.max_length(),
            "persona_file": persona_file.as_ref().map(|p| p.display().to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    print_agent_header(&agent);

    println!("  {}", style("── Details ──").dim());
    println!("  {}       {}", style("ID:").bold(), agent.id);
    println!("  {}     {}", style("Type:").bold(), &agent.agent_type);
    println!("  {}     {}", style("Slug:").bold(), slugify(&agent.name));
    println!(
        "  {}  {}",
        style("Created:").bold(),
        agent.created_at.format("%Y-%m-%d %H:%M UTC")
    );
    println!();

    if !agent.system_prompt.is_empty() {
        println!("  {}", style("── System Prompt ──").dim());
        for line in agent.system_prompt.lines() {
            println!("  {line}");
        }
        println!();
    }

    println!("  {}", style("── Conversation ──").dim());
    println!(
        "  {}  {} / {}",
        style("Messages:").bold(),
        messages.len(),
        state.window.max_length()
    );
    match persona_file {
        Some(path) => println!("  {}   {}", style("Persona:").bold(), path.display()),
        None => println!(
            "  {}   {}",
            style("Persona:").bold(),
            style("(derived from agent record)").dim()
        ),
    }
    println!();

    Ok(())
}

/// Delete an agent permanently with confirmation.
pub async fn delete_agent(state: &AppState, id: AgentId, force: bool, json: bool) -> Result<()> {
    let agent = state.get_agent(id).await?;

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Permanently delete agent '{}' and its history?",
                style(&agent.name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.delete_agent(id).await?;

    if json {
        println!("{}", serde_json::json!({"deleted": true, "id": id}));
    } else {
        println!(
            "  {} Agent '{}' deleted.",
            style("✓").red().bold(),
            agent.name
        );
    }

    Ok(())
}

fn print_agent_header(agent: &Agent) {
    println!();
    println!("  {}", style(&agent.name).cyan().bold());
    if !agent.description.is_empty() {
        println!("  {}", style(&agent.description).dim());
    }
    println!();
}

/// Shorten `s` to at most `max` characters, ending in "..." when cut.
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 40), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("ünïcödé ✓ text", 10), "ünïcödé...");
    }
}
