//! Console command parsing for the chat loop.
//!
//! The bare words `exit` and `clear` (any case) are commands, as are slash forms such
//! as `/exit` and `/history`. Anything else is sent as a chat message.

use console::style;

/// Commands recognised in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the agent's conversation history.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Show the messages in the window.
    History,
    /// Unknown slash command.
    Unknown(String),
}

/// Parse user input as a console command.
///
/// Returns `None` when the input is a chat message.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("exit") {
        return Some(ChatCommand::Exit);
    }
    if trimmed.eq_ignore_ascii_case("clear") {
        return Some(ChatCommand::Clear);
    }

    if !trimmed.starts_with('/') {
        return None;
    }

    let cmd = trimmed
        .split_whitespace()
        .next()
        .unwrap_or(trimmed)
        .to_lowercase();

    match cmd.as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/clear" => Some(ChatCommand::Clear),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/history" => Some(ChatCommand::History),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}     {}", style("exit, /exit").cyan(), "End the chat session");
    println!("  {}   {}", style("clear, /clear").cyan(), "Clear the conversation history");
    println!("  {}        {}", style("/history").cyan(), "Show the messages in the window");
    println!("  {}           {}", style("/help").cyan(), "Show this help message");
    println!();
    println!("  {}", style("Ctrl+D to exit").dim());
    println!();
}
