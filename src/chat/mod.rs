//! Interactive chat REPL for papertrail.
//!
//! Each line the user types is one [`Agent::respond`] turn. The agent's
//! conversation carries every earlier question, tool result, and answer, so
//! follow-up questions keep their context.

mod commands;

pub(crate) use commands::print_tools;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::agent::Agent;
use crate::config::Config;
use crate::constants::{EXIT_KEYWORDS, HISTORY_FILENAME};
use crate::format;
use crate::tokens;

/// What the REPL should do with one line of input.
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Skip,
    Exit,
    Command(&'a str),
    Utterance(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        Input::Skip
    } else if EXIT_KEYWORDS.iter().any(|k| line.eq_ignore_ascii_case(k)) {
        Input::Exit
    } else if line.starts_with('/') {
        Input::Command(line)
    } else {
        Input::Utterance(line)
    }
}

/// Runs the interactive chat REPL until the user leaves.
///
/// # Readline behavior
///
/// - `exit` / `quit` (any case) or **Ctrl+D**: ends the session
/// - **Ctrl+C**: cancels current input, stays in the REPL
/// - history is persisted to `~/.cache/papertrail/chat_history.txt`
///
/// A failed turn ends the session and its error is returned.
pub async fn run_chat(mut agent: Agent) -> Result<()> {
    println!(
        "{} [model: {}] (type 'exit' to quit, /help for commands)",
        "papertrail chat".bold().cyan(),
        agent.model().yellow(),
    );
    println!();

    let mut rl = DefaultEditor::new()?;
    let history_path = Config::cache_dir()?.join(HISTORY_FILENAME);
    if history_path.exists() {
        let _ = rl.load_history(&history_path);
    }

    let result = repl(&mut agent, &mut rl).await;

    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Err(e) = rl.save_history(&history_path) {
        tracing::warn!(path = %history_path.display(), error = %e, "could not save chat history");
    }

    result
}

async fn repl(agent: &mut Agent, rl: &mut DefaultEditor) -> Result<()> {
    loop {
        let line = match rl.readline(&format!("{} ", ">".green().bold())) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("{}", "^C".dimmed());
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "goodbye.".dimmed());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        match classify(&line) {
            Input::Skip => continue,
            Input::Exit => {
                println!("{}", "goodbye.".dimmed());
                return Ok(());
            }
            Input::Command(command) => {
                if let commands::CommandAction::Unknown(cmd) =
                    commands::handle_slash_command(command, agent)
                {
                    println!("{} Unknown command: {}", "?".yellow(), cmd);
                }
            }
            Input::Utterance(utterance) => {
                let _ = rl.add_history_entry(utterance);
                println!();
                let answer = agent.respond(utterance).await?;
                println!("{}", format::render_markdown_lite(&answer));
                println!();
                tokens::print_usage(agent.conversation(), agent.model());
                println!();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_input() {
        assert_eq!(classify("   "), Input::Skip);
        assert_eq!(classify("exit"), Input::Exit);
        assert_eq!(classify("  QUIT "), Input::Exit);
        assert_eq!(classify("/tools"), Input::Command("/tools"));
        assert_eq!(
            classify(" exit strategies for startups "),
            Input::Utterance("exit strategies for startups")
        );
    }
}
