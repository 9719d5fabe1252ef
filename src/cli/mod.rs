//! Command-line interface definition and dispatch for papertrail.
//!
//! Uses [`clap`] for argument parsing with derive macros. `ask` and `chat`
//! share [`build_agent`], which wires config, transport, paper index, and
//! tool registry into an [`Agent`].

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::agent::Agent;
use crate::config::Config;
use crate::conversation::Conversation;
use crate::provider::{self, ModelSelection};
use crate::retrieval::{PaperIndex, Retriever};
use crate::tools::ToolRegistry;
use crate::{chat, tokens};

/// Top-level CLI structure for papertrail.
#[derive(Parser)]
#[command(
    name = "papertrail",
    about = "A research assistant that answers questions from your papers"
)]
pub struct Cli {
    /// Log agent decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands. The `///` doc comments on variants double as
/// `--help` text rendered by clap.
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a one-shot research question
    Ask {
        /// The question to ask
        query: Vec<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
        /// Provider to use (ollama, anthropic, openai, openrouter)
        #[arg(short, long)]
        provider: Option<String>,
    },
    /// Start an interactive research session
    Chat {
        /// Provider to use (ollama, anthropic, openai, openrouter)
        #[arg(long)]
        provider: Option<String>,
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List available models
    Models,
    /// List research tools and the names the model may call them by
    Tools,
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Subcommands for the `config` command.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective config
    Show,
    /// Print the config file path
    Path,
}

pub fn parse() -> Cli {
    Cli::parse()
}

/// Dispatches the parsed CLI command to its handler.
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Ask {
            query,
            model,
            provider: provider_name,
        } => {
            let query = query.join(" ");
            if query.trim().is_empty() {
                anyhow::bail!("No query provided. Usage: papertrail ask \"your question here\"");
            }

            let config = Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;

            println!(
                "{} [model: {}]",
                "papertrail".bold().cyan(),
                selection.model.yellow(),
            );
            println!();
            println!("{} {}", ">".green().bold(), query);
            println!();

            let mut agent = build_agent(&config, &selection)?;
            let answer = agent.run(&query).await?;
            println!("{}", crate::format::render_markdown_lite(&answer));
            println!();
            tokens::print_usage(agent.conversation(), agent.model());
            Ok(())
        }
        Commands::Chat {
            provider: provider_name,
            model,
        } => {
            let config = Config::load()?;
            let selection =
                provider::resolve_model(provider_name.as_deref(), model.as_deref(), &config)?;
            let agent = build_agent(&config, &selection)?;
            chat::run_chat(agent).await
        }
        Commands::Models => {
            let config = Config::load()?;
            provider::list_models(&config).await
        }
        Commands::Tools => {
            let config = Config::load()?;
            let selection = provider::resolve_model(None, None, &config)?;
            // Listing never sends a request, so the transport is not connected.
            let transport: Arc<dyn provider::ModelTransport> =
                Arc::new(provider::OllamaTransport::new(crate::constants::OLLAMA_DEFAULT_BASE_URL)?);
            let registry = ToolRegistry::with_research_tools(
                transport,
                selection.model,
                Arc::new(PaperIndex::from_config(&config)),
            )?;
            println!("{}", "Research tools:".bold());
            chat::print_tools(&registry);
            Ok(())
        }
        Commands::Config { action } => {
            match action {
                ConfigAction::Show => {
                    let config = Config::load()?;
                    let path = Config::config_path()?;
                    println!("{} {}", "Config path:".bold(), path.display());
                    println!();
                    println!("{}", toml::to_string_pretty(&config)?);
                }
                ConfigAction::Path => {
                    println!("{}", Config::config_path()?.display());
                }
            }
            Ok(())
        }
    }
}

/// Wires an agent for `selection` from the loaded config.
fn build_agent(config: &Config, selection: &ModelSelection) -> Result<Agent> {
    let transport = provider::connect(config, selection)?;
    let retriever: Arc<dyn Retriever> = Arc::new(PaperIndex::from_config(config));
    let tools = ToolRegistry::with_research_tools(
        Arc::clone(&transport),
        selection.model.clone(),
        retriever,
    )?;
    tracing::debug!(
        provider = %selection.provider,
        model = %selection.model,
        papers = %config.papers_dir().display(),
        "agent ready"
    );
    Ok(Agent::new(
        transport,
        tools,
        selection.model.clone(),
        Conversation::new(config.system_prompt()),
    )
    .with_max_tool_rounds(config.max_tool_rounds()))
}
