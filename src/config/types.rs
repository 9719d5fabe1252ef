//! Struct definitions and serde defaults for papertrail configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration, deserialized from `config.toml`.
///
/// Fields use serde defaults so papertrail can run with sensible defaults
/// when no config file exists.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default model identifier (e.g. `"llama3.1:8b"` or `"anthropic/claude-sonnet-4-6"`).
    #[serde(default)]
    pub model: Option<String>,
    /// Per-provider settings.
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Default provider name (e.g., "ollama", "anthropic").
    #[serde(default)]
    pub default_provider: Option<String>,
    /// Seed system message for every conversation. Unset means the built-in
    /// tool-calling prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Tool-calling loop settings.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Local paper index settings.
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Provider-specific configuration map.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    pub ollama: Option<ProviderEntry>,
    pub anthropic: Option<ProviderEntry>,
    pub openai: Option<ProviderEntry>,
    pub openrouter: Option<ProviderEntry>,
}

/// Connection details for a single LLM provider.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ProviderEntry {
    /// API key for authentication. Can also be set via environment variables.
    pub api_key: Option<String>,
    /// Custom base URL for the provider's API.
    pub base_url: Option<String>,
    /// Model identifier to use with this provider, overriding the global default.
    pub model: Option<String>,
}

/// Settings for the tool-calling loop.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct AgentConfig {
    /// Ceiling on tool-calling rounds per turn. `0` removes the ceiling.
    pub max_tool_rounds: Option<usize>,
}

/// Settings for the local paper index behind `get_search_results`.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Directory of `.txt`/`.md` papers. Relative paths resolve against the
    /// working directory.
    pub papers_dir: Option<PathBuf>,
    /// Chunk size in characters.
    pub chunk_size: Option<usize>,
    /// Overlap between consecutive chunks in characters.
    pub chunk_overlap: Option<usize>,
    /// Number of chunks returned per search.
    pub top_k: Option<usize>,
}
