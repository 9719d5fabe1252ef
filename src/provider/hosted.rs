//! Hosted-model transport built on rig-core.
//!
//! Anthropic, OpenAI, and OpenRouter are reached through rig-core's provider
//! clients behind enum dispatch. Tool schemas are not registered with rig as
//! native tools; instead they are described in the preamble and the model is
//! asked to answer with a `tool_calls` JSON object, which the normalizer
//! recovers from the text reply. The loop therefore sees the same text/JSON
//! protocol regardless of backend.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Chat;
use rig::message::Message as RigMessage;
use rig::providers::{anthropic, openai, openrouter};

use super::transport::{ModelTransport, RawResponse};
use crate::message::{Message, Role};
use crate::tools::ToolDefinition;

/// Internal enum wrapping provider-specific clients.
pub(super) enum ClientKind {
    Anthropic(anthropic::Client),
    OpenAI(openai::Client),
    OpenRouter(openrouter::Client),
}

pub struct HostedTransport {
    client: ClientKind,
}

/// Builds an agent from the given client, model, and preamble, then
/// executes the provided block with the agent bound to `$agent`.
macro_rules! with_agent {
    ($client:expr, $model:expr, $preamble:expr, |$agent:ident| $body:expr) => {{
        let $agent = $client
            .agent($model)
            .preamble($preamble)
            .max_tokens(crate::constants::MAX_TOKENS)
            .build();
        $body
    }};
}

/// Dispatches an operation across provider-specific clients.
macro_rules! dispatch {
    ($self:expr, |$client:ident| $body:expr) => {
        match &$self.client {
            ClientKind::Anthropic($client) => $body,
            ClientKind::OpenAI($client) => $body,
            ClientKind::OpenRouter($client) => $body,
        }
    };
}

impl HostedTransport {
    pub(super) fn new(client: ClientKind) -> Self {
        Self { client }
    }

    pub fn anthropic(api_key: &str) -> Result<Self> {
        let client =
            anthropic::Client::new(api_key).context("Failed to create Anthropic client")?;
        Ok(Self::new(ClientKind::Anthropic(client)))
    }

    pub fn openai(api_key: &str) -> Result<Self> {
        let client = openai::Client::new(api_key).context("Failed to create OpenAI client")?;
        Ok(Self::new(ClientKind::OpenAI(client)))
    }

    pub fn openrouter(api_key: &str) -> Result<Self> {
        let client =
            openrouter::Client::new(api_key).context("Failed to create OpenRouter client")?;
        Ok(Self::new(ClientKind::OpenRouter(client)))
    }
}

#[async_trait]
impl ModelTransport for HostedTransport {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawResponse> {
        let mut preamble = messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.text().to_string())
            .unwrap_or_default();
        if let Some(tools) = tools {
            preamble.push_str("\n\n");
            preamble.push_str(&tool_call_instructions(tools));
        }
        let (prompt, history) = split_history(messages);
        tracing::debug!(model, history = history.len(), with_tools = tools.is_some(), "sending hosted chat request");

        let result = dispatch!(self, |client| {
            with_agent!(client, model, &preamble, |agent| {
                agent.chat(prompt.clone(), history.clone()).await
            })
        });

        match result {
            Ok(text) => Ok(RawResponse::from_text(text)),
            Err(e) => {
                tracing::error!(model, error = %e, "hosted model request failed");
                Err(anyhow::anyhow!("Model request failed: {e}"))
            }
        }
    }
}

/// Splits conversation state into rig's (prompt, history) pair.
///
/// The first system message is sent as the preamble and skipped here. Later
/// system messages (such as the finalize instruction) and tool results have no
/// rig role of their own and travel as user turns. The last message becomes
/// the prompt.
fn split_history(messages: &[Message]) -> (RigMessage, Vec<RigMessage>) {
    let first_system = messages.iter().position(|m| m.role == Role::System);
    let mut converted: Vec<RigMessage> = messages
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != first_system)
        .map(|(_, m)| match m.role {
            Role::Assistant => RigMessage::assistant(m.text()),
            Role::Tool => RigMessage::user(format!("Tool result:\n{}", m.text())),
            Role::System => RigMessage::user(format!("Instruction: {}", m.text())),
            Role::User => RigMessage::user(m.text()),
        })
        .collect();
    let prompt = converted.pop().unwrap_or_else(|| RigMessage::user(""));
    (prompt, converted)
}

/// Describes the tools and the JSON reply format expected for calls.
pub(crate) fn tool_call_instructions(tools: &[ToolDefinition]) -> String {
    let mut out = String::from("## Tools\n\nYou can call these tools:\n\n");
    for tool in tools {
        out.push_str(&format!("### {}\n{}\n", tool.name, tool.description));
        let required = tool.required();
        if let Some(properties) = tool.parameters.get("properties").and_then(|p| p.as_object()) {
            for (name, schema) in properties {
                let marker = if required.contains(&name.as_str()) {
                    "required"
                } else {
                    "optional"
                };
                let desc = schema
                    .get("description")
                    .and_then(|d| d.as_str())
                    .unwrap_or("");
                out.push_str(&format!("  - `{name}` ({marker}): {desc}\n"));
            }
        }
        out.push('\n');
    }
    out.push_str(
        "To call tools, reply with only a JSON object of the form \
{\"tool_calls\": [{\"name\": \"tool_name\", \"parameters\": {\"arg\": \"value\"}}]}. \
When no tool is needed, answer in plain text.",
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_history_uses_last_message_as_prompt() {
        let messages = vec![
            Message::system("seed"),
            Message::user("question"),
            Message::tool("results"),
            Message::system("finalize"),
        ];
        let (_prompt, history) = split_history(&messages);
        // seed system goes to the preamble, finalize becomes the prompt
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_tool_call_instructions_lists_parameters() {
        let defs = vec![ToolDefinition {
            name: "compare_papers".into(),
            description: "Compare two research paper texts.".into(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "text1": {"type": "string", "description": "first"},
                    "note": {"type": "string"}
                },
                "required": ["text1"]
            }),
        }];
        let text = tool_call_instructions(&defs);
        assert!(text.contains("### compare_papers"));
        assert!(text.contains("`text1` (required): first"));
        assert!(text.contains("`note` (optional)"));
        assert!(text.contains("\"tool_calls\""));
    }
}
