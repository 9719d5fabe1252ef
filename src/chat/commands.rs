//! Slash command handlers for the chat REPL.
//!
//! Dispatches `/history`, `/tools`, and `/help`. Returns a [`CommandAction`]
//! so the REPL loop can decide how to proceed.

use colored::Colorize;

use crate::agent::Agent;
use crate::format;

/// Action returned by slash command handling.
pub(crate) enum CommandAction {
    Continue,
    Unknown(String),
}

pub(crate) fn handle_slash_command(command: &str, agent: &Agent) -> CommandAction {
    match command {
        "/history" => {
            let mut shown = 0;
            for msg in agent.conversation().visible() {
                println!("{}", format::format_message(msg));
                println!();
                shown += 1;
            }
            if shown == 0 {
                println!("{}", "Nothing yet.".dimmed());
            }
            CommandAction::Continue
        }
        "/tools" => {
            print_tools(agent.tools());
            CommandAction::Continue
        }
        "/help" => {
            println!("{}", "Commands:".bold());
            println!("  {} - show conversation history", "/history".cyan());
            println!("  {} - list research tools", "/tools".cyan());
            println!("  {} - show this help", "/help".cyan());
            println!("  {} - exit", "exit, quit, Ctrl+D".cyan());
            CommandAction::Continue
        }
        _ => CommandAction::Unknown(command.to_string()),
    }
}

/// Prints each tool with its description and synonyms.
pub(crate) fn print_tools(tools: &crate::tools::ToolRegistry) {
    for tool in tools.iter() {
        println!("  {} - {}", tool.name().cyan(), tool.description());
        if !tool.synonyms().is_empty() {
            println!("    {} {}", "also:".dimmed(), tool.synonyms().join(", ").dimmed());
        }
    }
}
