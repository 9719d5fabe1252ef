//! A transport that replays pre-configured responses, for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::transport::{ModelTransport, RawResponse};
use crate::message::Message;
use crate::tools::ToolDefinition;

/// One request as the transport saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub tool_names: Option<Vec<String>>,
}

/// Returns queued responses in order and records every request.
///
/// Once the queue is exhausted it answers with empty content, which the
/// loop reads as "no tool calls".
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<RawResponse, String>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(|v| Ok(RawResponse::new(v))).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a transport failure after the current responses.
    pub fn then_fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn chat(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
    ) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            tool_names: tools.map(|t| t.iter().map(|d| d.name.clone()).collect()),
        });
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow::anyhow!(message)),
            None => Ok(RawResponse::from_text("")),
        }
    }
}
