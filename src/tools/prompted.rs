//! Shared plumbing for tools that are prompt-templated model calls.

use std::sync::Arc;

use crate::message::Message;
use crate::provider::ModelTransport;

use super::ToolError;

/// Sends a single-message prompt to the model and returns its text.
#[derive(Clone)]
pub struct PromptRunner {
    transport: Arc<dyn ModelTransport>,
    model: String,
}

impl PromptRunner {
    pub fn new(transport: Arc<dyn ModelTransport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    /// Runs `prompt` as a fresh one-message conversation, without tools.
    pub async fn complete(&self, prompt: String) -> Result<String, ToolError> {
        let messages = [Message::user(prompt)];
        let response = self.transport.chat(&self.model, &messages, None).await?;
        Ok(response.content().to_string())
    }
}
