//! The model transport seam and the raw payload it returns.
//!
//! Everything that talks to a language model goes through
//! [`ModelTransport::chat`]. The agent loop never assumes a response shape:
//! it receives a [`RawResponse`] and lets the normalizer and extractor make
//! sense of it.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::message::Message;
use crate::tools::ToolDefinition;

/// A blocking-per-call chat endpoint.
///
/// `tools` is `Some` only when the caller wants the model to see the tool
/// schemas on this request. Transport failures are returned as errors and
/// are fatal to the turn that issued them.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawResponse>;
}

/// Opaque model reply.
///
/// May carry `message.content`, a top-level `tool_calls` field, a `tools`
/// list, or any mix of these. Accessors never fail; absent fields read as
/// empty.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse(Value);

impl RawResponse {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Wraps plain text in the `{"message": {"content": ...}}` shape.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(json!({ "message": { "content": text.into() } }))
    }

    /// Text content, read from `message.content` and then top-level `content`.
    pub fn content(&self) -> &str {
        self.0
            .get("message")
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .or_else(|| self.0.get("content").and_then(Value::as_str))
            .unwrap_or("")
    }

    /// The native tool-call field.
    ///
    /// A top-level `tool_calls` key wins whenever it is present. Ollama nests
    /// native calls under `message.tool_calls`, which is consulted second.
    pub fn tool_calls(&self) -> Option<&Value> {
        self.0.get("tool_calls").or_else(|| {
            self.0
                .get("message")
                .and_then(|m| m.get("tool_calls"))
                .filter(|v| !v.is_null())
        })
    }

    /// Entries of a top-level `tools` list, if there is one.
    pub fn tools(&self) -> Option<&Vec<Value>> {
        self.0.get("tools").and_then(Value::as_array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_prefers_message_content() {
        let raw = RawResponse::new(json!({"message": {"content": "inner"}, "content": "outer"}));
        assert_eq!(raw.content(), "inner");
    }

    #[test]
    fn test_content_falls_back_to_top_level() {
        let raw = RawResponse::new(json!({"message": {"content": ""}, "content": "outer"}));
        assert_eq!(raw.content(), "outer");
        assert_eq!(RawResponse::new(json!({})).content(), "");
    }

    #[test]
    fn test_tool_calls_top_level_wins_over_nested() {
        let raw = RawResponse::new(json!({
            "tool_calls": [],
            "message": {"tool_calls": [{"function": {"name": "x"}}]}
        }));
        assert_eq!(raw.tool_calls(), Some(&json!([])));
    }

    #[test]
    fn test_tool_calls_reads_ollama_nesting() {
        let raw = RawResponse::new(json!({
            "message": {"content": "", "tool_calls": [{"function": {"name": "x"}}]}
        }));
        assert!(raw.tool_calls().is_some());
        assert!(RawResponse::from_text("hi").tool_calls().is_none());
    }
}
