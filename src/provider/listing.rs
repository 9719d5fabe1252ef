//! Model listing and discovery.
//!
//! Displays available models grouped by provider, including the models
//! installed on the local Ollama server.

use anyhow::Result;

use super::resolve::resolve_model;
use crate::config::Config;

/// List all available models, grouped by provider.
pub async fn list_models(config: &Config) -> Result<()> {
    let selection = resolve_model(None, None, config)?;
    let current = &selection.model;

    println!("Available models:\n");

    println!("  ollama:");
    match list_ollama_models(config).await {
        Ok(models) if models.is_empty() => {
            println!(
                "    (no models found -- run `ollama pull {}`)",
                crate::constants::OLLAMA_DEFAULT_MODEL
            );
        }
        Ok(models) => {
            for model in &models {
                let marker = if model == current { " (default)" } else { "" };
                println!("    {model}{marker}");
            }
        }
        Err(e) => {
            tracing::debug!(error = %e, "could not query ollama");
            println!("    (ollama not running)");
        }
    }

    for (label, models) in [
        ("anthropic", crate::models::ANTHROPIC_MODELS),
        ("openai", crate::models::OPENAI_MODELS),
    ] {
        println!("\n  {label}:");
        for info in models {
            let marker = if info.name == current { " (default)" } else { "" };
            println!("    {}{marker}", info.name);
        }
    }

    Ok(())
}

/// Query Ollama's local API for installed models.
async fn list_ollama_models(config: &Config) -> Result<Vec<String>> {
    let base_url = config
        .base_url("ollama")
        .unwrap_or(crate::constants::OLLAMA_DEFAULT_BASE_URL);

    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));

    let resp: serde_json::Value = reqwest::get(&url).await?.json().await?;

    let models = resp["models"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["name"].as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default();

    Ok(models)
}
