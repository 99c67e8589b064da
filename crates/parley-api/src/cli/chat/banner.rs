//! Welcome banner display for chat sessions.

use console::style;

/// Print the welcome banner at the start of a chat session.
pub fn print_welcome_banner(name: &str, description: &str, model: &str, agent_id: &str) {
    println!();
    println!("  {}", style(name).cyan().bold());
    if !description.is_empty() {
        println!("  {}", style(description).dim());
    }
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!("  {}  {}", style("Agent:").bold(), style(agent_id).dim());
    println!();
    println!(
        "  {}",
        style("Type 'exit' to quit, 'clear' to reset history, /help for more").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

/// Warn that completions will fail until a credential is configured.
pub fn print_missing_key_warning(env_var: &str) {
    println!(
        "  {} No API key configured. Set {} or add api_key to config.toml.",
        style("!").yellow().bold(),
        style(env_var).yellow()
    );
    println!();
}
