//! Ollama chat transport.
//!
//! Talks to a local Ollama server's native `/api/chat` endpoint and hands the
//! reply back untouched, so whatever tool-call shape the model chose survives
//! for the extractor. Replies that are not JSON objects are wrapped as plain
//! text content.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::transport::{ModelTransport, RawResponse};
use crate::message::Message;
use crate::tools::ToolDefinition;

pub struct OllamaTransport {
    client: reqwest::Client,
    base_url: String,
}

impl OllamaTransport {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(crate::constants::OLLAMA_TIMEOUT_SECS))
            .build()
            .context("Failed to create Ollama HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Builds the non-streaming `/api/chat` request body.
    fn payload(model: &str, messages: &[Message], tools: Option<&[ToolDefinition]>) -> Value {
        let mut payload = json!({
            "model": model,
            "messages": messages,
            "stream": false,
        });
        if let Some(tools) = tools {
            payload["tools"] = Value::Array(tools.iter().map(ToolDefinition::to_function_spec).collect());
        }
        payload
    }

    /// Interprets a response body, falling back to plain text.
    fn parse_body(body: String) -> RawResponse {
        match serde_json::from_str::<Value>(&body) {
            Ok(value) if value.is_object() => RawResponse::new(value),
            _ => RawResponse::from_text(body),
        }
    }
}

#[async_trait]
impl ModelTransport for OllamaTransport {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawResponse> {
        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let payload = Self::payload(model, messages, tools);
        tracing::debug!(%url, model, messages = messages.len(), with_tools = tools.is_some(), "sending chat request");

        let response = match self.client.post(&url).json(&payload).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(%url, error = %e, "error calling Ollama");
                return Err(e).context(format!("Failed to reach Ollama at {}", self.base_url));
            }
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read Ollama response body")?;

        if !status.is_success() {
            tracing::error!(%status, %body, "Ollama returned an error");
            anyhow::bail!("Ollama request failed ({status}): {body}");
        }

        Ok(Self::parse_body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_includes_tools_only_when_given() {
        let messages = vec![Message::user("hi")];
        let without = OllamaTransport::payload("m", &messages, None);
        assert!(without.get("tools").is_none());
        assert_eq!(without["stream"], false);
        assert_eq!(without["messages"][0]["role"], "user");

        let defs = vec![ToolDefinition {
            name: "get_search_results".into(),
            description: "search".into(),
            parameters: json!({"type": "object", "properties": {}, "required": []}),
        }];
        let with = OllamaTransport::payload("m", &messages, Some(&defs));
        assert_eq!(with["tools"][0]["type"], "function");
        assert_eq!(with["tools"][0]["function"]["name"], "get_search_results");
    }

    #[test]
    fn test_parse_body_wraps_plain_text() {
        let raw = OllamaTransport::parse_body("just words".to_string());
        assert_eq!(raw.content(), "just words");

        let raw = OllamaTransport::parse_body(r#"{"message": {"content": "ok"}}"#.to_string());
        assert_eq!(raw.content(), "ok");

        let raw = OllamaTransport::parse_body("\"a json string\"".to_string());
        assert_eq!(raw.content(), "\"a json string\"");
    }
}
