//! LLM provider abstraction for papertrail.
//!
//! Every backend sits behind the [`ModelTransport`] trait. Ollama is reached
//! over its native HTTP API; Anthropic, OpenAI, and OpenRouter go through
//! rig-core. [`connect`] picks the transport for a resolved
//! [`ModelSelection`].

mod hosted;
mod kind;
mod listing;
mod ollama;
mod resolve;
#[cfg(test)]
pub mod scripted;
mod transport;

use std::sync::Arc;

use anyhow::{Context, Result};

pub use hosted::HostedTransport;
pub use kind::ProviderKind;
pub use listing::list_models;
pub use ollama::OllamaTransport;
pub use resolve::{resolve_model, ModelSelection};
pub use transport::{ModelTransport, RawResponse};

use crate::config::Config;

/// Builds the transport for the selected provider.
///
/// # Errors
///
/// Returns an error if a hosted provider has no API key configured or if
/// client construction fails.
pub fn connect(config: &Config, selection: &ModelSelection) -> Result<Arc<dyn ModelTransport>> {
    let provider = selection.provider;
    let missing_key = || {
        format!(
            "No API key found for {provider}. Set {}_API_KEY or configure it in config.toml",
            provider.as_str().to_uppercase()
        )
    };

    let transport: Arc<dyn ModelTransport> = match provider {
        ProviderKind::Ollama => {
            let base_url = config
                .base_url("ollama")
                .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);
            Arc::new(OllamaTransport::new(base_url)?)
        }
        ProviderKind::Anthropic => {
            let key = config.resolve_api_key("anthropic").with_context(missing_key)?;
            Arc::new(HostedTransport::anthropic(&key)?)
        }
        ProviderKind::OpenAI => {
            let key = config.resolve_api_key("openai").with_context(missing_key)?;
            Arc::new(HostedTransport::openai(&key)?)
        }
        ProviderKind::OpenRouter => {
            let key = config.resolve_api_key("openrouter").with_context(missing_key)?;
            Arc::new(HostedTransport::openrouter(&key)?)
        }
    };
    tracing::debug!(%provider, model = %selection.model, "connected transport");
    Ok(transport)
}
