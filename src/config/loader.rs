//! File loading and merging for papertrail configuration.

use anyhow::{Context, Result};
use std::fs;

use super::types::{AgentConfig, Config, RetrievalConfig};

/// Written to the global config path the first time papertrail runs.
const DEFAULT_CONFIG_TOML: &str = r#"default_provider = "ollama"

[provider.ollama]
base_url = "http://localhost:11434"

[provider.anthropic]
api_key = "{env:ANTHROPIC_API_KEY}"

[provider.openai]
api_key = "{env:OPENAI_API_KEY}"

[provider.openrouter]
api_key = "{env:OPENROUTER_API_KEY}"

[agent]
max_tool_rounds = 10

[retrieval]
papers_dir = "research_papers"
"#;

impl Config {
    /// Loads the global config from `~/.config/papertrail/config.toml`.
    ///
    /// If no config file exists, creates one with sensible defaults
    /// (including `{env:VAR}` placeholders for API keys) and returns it.
    pub(super) fn load_global() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, DEFAULT_CONFIG_TOML)
                .with_context(|| format!("Failed to write default config to {:?}", path))?;
            tracing::info!(path = %path.display(), "wrote default config");
            return Self::parse(DEFAULT_CONFIG_TOML)
                .with_context(|| "Failed to parse default config".to_string());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::parse(&contents).with_context(|| format!("Failed to parse config at {:?}", path))
    }

    /// Look for papertrail.toml in current dir, then walk up to git root.
    pub(super) fn load_project() -> Result<Option<Config>> {
        let mut dir = std::env::current_dir()?;
        loop {
            let candidate = dir.join(crate::constants::PROJECT_CONFIG_FILENAME);
            if candidate.exists() {
                let contents = fs::read_to_string(&candidate)?;
                let config = Self::parse(&contents)
                    .with_context(|| format!("Failed to parse {:?}", candidate))?;
                tracing::debug!(path = %candidate.display(), "loaded project config");
                return Ok(Some(config));
            }
            if dir.join(".git").exists() || !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    pub(super) fn parse(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Merge project config over global config.
    /// Project values win when present.
    pub(super) fn merge(global: Config, project: Config) -> Config {
        Config {
            model: project.model.or(global.model),
            provider: global.provider, // TODO: deep merge providers so a project can override one base_url
            default_provider: project.default_provider.or(global.default_provider),
            system_prompt: project.system_prompt.or(global.system_prompt),
            agent: AgentConfig {
                max_tool_rounds: project
                    .agent
                    .max_tool_rounds
                    .or(global.agent.max_tool_rounds),
            },
            retrieval: RetrievalConfig {
                papers_dir: project.retrieval.papers_dir.or(global.retrieval.papers_dir),
                chunk_size: project.retrieval.chunk_size.or(global.retrieval.chunk_size),
                chunk_overlap: project
                    .retrieval
                    .chunk_overlap
                    .or(global.retrieval.chunk_overlap),
                top_k: project.retrieval.top_k.or(global.retrieval.top_k),
            },
        }
    }
}
