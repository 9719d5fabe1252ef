//! Environment variable substitution, API key resolution, and typed accessors.

use std::path::PathBuf;

use super::types::{Config, ProviderEntry};
use crate::constants::{
    DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_PAPERS_DIR,
    DEFAULT_TOP_K,
};

impl Config {
    /// Resolve {env:VAR_NAME} patterns in string fields.
    pub(super) fn resolve_substitutions(&mut self) {
        if let Some(ref mut model) = self.model {
            *model = Self::resolve_str(model);
        }
        if let Some(ref mut sp) = self.system_prompt {
            *sp = Self::resolve_str(sp);
        }
        if let Some(ref mut dp) = self.default_provider {
            *dp = Self::resolve_str(dp);
        }
        Self::resolve_provider_entry(&mut self.provider.ollama);
        Self::resolve_provider_entry(&mut self.provider.anthropic);
        Self::resolve_provider_entry(&mut self.provider.openai);
        Self::resolve_provider_entry(&mut self.provider.openrouter);
    }

    /// Resolves `{env:VAR}` patterns in a single provider entry's `api_key` and `base_url`.
    fn resolve_provider_entry(entry: &mut Option<ProviderEntry>) {
        if let Some(ref mut e) = entry {
            if let Some(ref mut key) = e.api_key {
                *key = Self::resolve_str(key);
            }
            if let Some(ref mut url) = e.base_url {
                *url = Self::resolve_str(url);
            }
        }
    }

    /// Replace {env:VAR} with the environment variable value.
    pub(super) fn resolve_str(s: &str) -> String {
        let mut result = s.to_string();
        while let Some(start) = result.find("{env:") {
            if let Some(end) = result[start..].find('}') {
                let var_name = &result[start + 5..start + end];
                let value = std::env::var(var_name).unwrap_or_default();
                result = format!(
                    "{}{}{}",
                    &result[..start],
                    value,
                    &result[start + end + 1..]
                );
            } else {
                break;
            }
        }
        result
    }

    fn provider_entry(&self, provider: &str) -> Option<&ProviderEntry> {
        match provider {
            "ollama" => self.provider.ollama.as_ref(),
            "anthropic" => self.provider.anthropic.as_ref(),
            "openai" => self.provider.openai.as_ref(),
            "openrouter" => self.provider.openrouter.as_ref(),
            _ => None,
        }
    }

    /// Resolve API key for a provider: env var first, then config value.
    pub fn resolve_api_key(&self, provider: &str) -> Option<String> {
        let env_key = format!("{}_API_KEY", provider.to_uppercase());
        if let Ok(val) = std::env::var(&env_key) {
            if !val.is_empty() {
                return Some(val);
            }
        }
        self.provider_entry(provider)
            .and_then(|e| e.api_key.clone())
            .filter(|k| !k.is_empty())
    }

    /// Base URL configured for a provider, if any.
    pub fn base_url(&self, provider: &str) -> Option<&str> {
        self.provider_entry(provider)
            .and_then(|e| e.base_url.as_deref())
            .filter(|u| !u.is_empty())
    }

    /// Get the configured default provider name, if any.
    pub fn provider_name(&self) -> Option<&str> {
        self.default_provider.as_deref()
    }

    /// Get the configured model name, stripping a provider prefix if present.
    pub fn model_name(&self) -> Option<String> {
        let m = self.model.as_deref()?;
        if m.is_empty() {
            return None;
        }
        match m.split_once('/') {
            Some((prov, model)) if crate::provider::ProviderKind::parse(prov).is_ok() => {
                Some(model.to_string())
            }
            _ => Some(m.to_string()),
        }
    }

    /// Seed system message for new conversations.
    pub fn system_prompt(&self) -> &str {
        self.system_prompt
            .as_deref()
            .unwrap_or(crate::constants::DEFAULT_SYSTEM_PROMPT)
    }

    /// Tool-round ceiling per turn; `None` means unbounded.
    pub fn max_tool_rounds(&self) -> Option<usize> {
        match self.agent.max_tool_rounds.unwrap_or(DEFAULT_MAX_TOOL_ROUNDS) {
            0 => None,
            n => Some(n),
        }
    }

    pub fn papers_dir(&self) -> PathBuf {
        self.retrieval
            .papers_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PAPERS_DIR))
    }

    pub fn chunk_size(&self) -> usize {
        self.retrieval.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE).max(1)
    }

    /// Chunk overlap, kept strictly below the chunk size.
    pub fn chunk_overlap(&self) -> usize {
        self.retrieval
            .chunk_overlap
            .unwrap_or(DEFAULT_CHUNK_OVERLAP)
            .min(self.chunk_size() - 1)
    }

    pub fn top_k(&self) -> usize {
        self.retrieval.top_k.unwrap_or(DEFAULT_TOP_K).max(1)
    }
}
