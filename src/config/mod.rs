//! Configuration types and path resolution for papertrail.
//!
//! Settings are stored as TOML at the platform's XDG config path
//! (e.g. `~/.config/papertrail/config.toml` on Linux). A `papertrail.toml`
//! found between the working directory and the git root overrides it.

mod loader;
mod paths;
mod resolve;
mod types;

pub use types::Config;

use anyhow::Result;

impl Config {
    /// Load config with precedence: project > global > defaults.
    /// Creates default config file if none exists.
    pub fn load() -> Result<Self> {
        let global = Self::load_global()?;
        let project = Self::load_project()?;

        let mut config = global;
        if let Some(proj) = project {
            config = Self::merge(config, proj);
        }

        config.resolve_substitutions();
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.max_tool_rounds(), Some(crate::constants::DEFAULT_MAX_TOOL_ROUNDS));
        assert_eq!(config.system_prompt(), crate::constants::DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.chunk_size(), 500);
        assert_eq!(config.chunk_overlap(), 100);
    }

    #[test]
    fn test_zero_rounds_means_unbounded() {
        let config = Config::parse("[agent]\nmax_tool_rounds = 0\n").unwrap();
        assert_eq!(config.max_tool_rounds(), None);
    }

    #[test]
    fn test_overlap_clamped_below_chunk_size() {
        let config =
            Config::parse("[retrieval]\nchunk_size = 50\nchunk_overlap = 80\n").unwrap();
        assert_eq!(config.chunk_overlap(), 49);
    }

    #[test]
    fn test_merge_prefers_project_values() {
        let global = Config::parse(
            "model = \"llama3\"\ndefault_provider = \"ollama\"\n[retrieval]\ntop_k = 2\nchunk_size = 300\n",
        )
        .unwrap();
        let project = Config::parse("model = \"qwen2.5\"\n[retrieval]\ntop_k = 7\n").unwrap();
        let merged = Config::merge(global, project);
        assert_eq!(merged.model.as_deref(), Some("qwen2.5"));
        assert_eq!(merged.provider_name(), Some("ollama"));
        assert_eq!(merged.top_k(), 7);
        assert_eq!(merged.chunk_size(), 300);
    }

    #[test]
    fn test_project_without_prompt_keeps_global_prompt() {
        let global = Config::parse("system_prompt = \"Cite sources.\"\n").unwrap();
        let project = Config::parse("[agent]\nmax_tool_rounds = 3\n").unwrap();
        let merged = Config::merge(global, project);
        assert_eq!(merged.system_prompt(), "Cite sources.");
        assert_eq!(merged.max_tool_rounds(), Some(3));
    }

    #[test]
    fn test_resolve_str_substitutes_env() {
        std::env::set_var("PAPERTRAIL_TEST_SUBST", "secret");
        assert_eq!(
            Config::resolve_str("key-{env:PAPERTRAIL_TEST_SUBST}-x"),
            "key-secret-x"
        );
        assert_eq!(Config::resolve_str("{env:unterminated"), "{env:unterminated");
    }

    #[test]
    fn test_model_name_strips_known_provider_prefix() {
        let config = Config::parse("model = \"ollama/qwen2.5\"\n").unwrap();
        assert_eq!(config.model_name().as_deref(), Some("qwen2.5"));
        let config = Config::parse("model = \"org/custom\"\n").unwrap();
        assert_eq!(config.model_name().as_deref(), Some("org/custom"));
    }
}
