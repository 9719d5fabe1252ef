//! Known models and their context windows.
//!
//! Consumed by `papertrail models` for listing and by [`crate::tokens`] for
//! the usage line printed after each answer.

use crate::constants::DEFAULT_CONTEXT_WINDOW;

pub struct ModelInfo {
    pub name: &'static str,
    /// Context window size in tokens.
    pub context_window: usize,
}

pub const ANTHROPIC_MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "claude-opus-4-6",
        context_window: 200_000,
    },
    ModelInfo {
        name: "claude-sonnet-4-6",
        context_window: 200_000,
    },
    ModelInfo {
        name: "claude-haiku-4-5",
        context_window: 200_000,
    },
];

pub const OPENAI_MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "gpt-4.1",
        context_window: 1_047_576,
    },
    ModelInfo {
        name: "gpt-4.1-mini",
        context_window: 1_047_576,
    },
    ModelInfo {
        name: "o4-mini",
        context_window: 200_000,
    },
];

/// Local models commonly used for tool calling. Installed models are listed
/// live from the Ollama server; this table only supplies context windows.
pub const OLLAMA_MODELS: &[ModelInfo] = &[
    ModelInfo {
        name: "llama3.1:8b",
        context_window: 131_072,
    },
    ModelInfo {
        name: "llama3.2",
        context_window: 131_072,
    },
    ModelInfo {
        name: "qwen2.5:7b",
        context_window: 32_768,
    },
    ModelInfo {
        name: "mistral",
        context_window: 32_768,
    },
];

/// Context window for `model`, matching on the name without an Ollama tag
/// when the exact name is unknown.
pub fn context_window(model: &str) -> usize {
    let all = || {
        ANTHROPIC_MODELS
            .iter()
            .chain(OPENAI_MODELS)
            .chain(OLLAMA_MODELS)
    };
    let base = model.split(':').next().unwrap_or(model);
    all()
        .find(|info| info.name == model)
        .or_else(|| all().find(|info| info.name == base))
        .map(|info| info.context_window)
        .unwrap_or(DEFAULT_CONTEXT_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_lookup() {
        assert_eq!(context_window("claude-sonnet-4-6"), 200_000);
        assert_eq!(context_window("llama3.1:8b"), 131_072);
        assert_eq!(context_window("mistral:7b-instruct"), 32_768);
        assert_eq!(context_window("some-new-model"), DEFAULT_CONTEXT_WINDOW);
    }
}
