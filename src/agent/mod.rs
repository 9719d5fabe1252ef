//! The tool-calling agent loop.
//!
//! One turn runs a small state machine:
//!
//! ```text
//! AWAIT_MODEL --tool calls--> EXECUTE_TOOLS --> AWAIT_MODEL
//!      |                            |
//!      +--no tool calls--+   round limit reached
//!                        v          v
//!                      FINALIZE <---+
//! ```
//!
//! Tool schemas are sent only on the first model request of a turn. Every
//! executed tool appends its output to the conversation as a tool message.
//! FINALIZE appends a closing instruction and asks the model, without tools,
//! for the answer.

pub mod extract;
pub mod literal;
pub mod normalize;
pub mod repair;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::constants::{
    CONVERSATIONAL_ANSWER_INSTRUCTION, EMPTY_ANSWER_FALLBACK, FINAL_ANSWER_INSTRUCTION,
};
use crate::conversation::Conversation;
use crate::message::Message;
use crate::provider::ModelTransport;
use crate::tools::{ToolDefinition, ToolRegistry};

use extract::ToolInvocation;

/// Drives one conversation against one model with one tool registry.
pub struct Agent {
    transport: Arc<dyn ModelTransport>,
    tools: ToolRegistry,
    conversation: Conversation,
    model: String,
    max_tool_rounds: Option<usize>,
}

/// How a turn ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub answer: String,
    /// Rounds of tool execution before finalizing.
    pub tool_rounds: usize,
    /// The model still wanted tools when the round limit stopped it.
    pub hit_round_limit: bool,
}

enum Step {
    AwaitModel { advertise_tools: bool },
    ExecuteTools(Vec<ToolInvocation>),
    Finalize,
}

impl Agent {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        tools: ToolRegistry,
        model: impl Into<String>,
        conversation: Conversation,
    ) -> Self {
        Self {
            transport,
            tools,
            conversation,
            model: model.into(),
            max_tool_rounds: None,
        }
    }

    /// Caps tool rounds per turn. `None` lets the model call tools until it
    /// stops on its own.
    pub fn with_max_tool_rounds(mut self, limit: Option<usize>) -> Self {
        self.max_tool_rounds = limit;
        self
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Answers one query and returns the polished answer.
    ///
    /// The answer is not appended to the conversation.
    pub async fn run(&mut self, query: &str) -> Result<String> {
        let outcome = self.turn(query, FINAL_ANSWER_INSTRUCTION).await?;
        Ok(outcome.answer)
    }

    /// Answers one interactive utterance and records the answer as an
    /// assistant message, so later turns see it.
    pub async fn respond(&mut self, utterance: &str) -> Result<String> {
        let outcome = self.turn(utterance, CONVERSATIONAL_ANSWER_INSTRUCTION).await?;
        let answer = if outcome.answer.is_empty() {
            EMPTY_ANSWER_FALLBACK.to_string()
        } else {
            outcome.answer
        };
        self.conversation.push(Message::assistant(&answer));
        Ok(answer)
    }

    /// Runs the state machine for one user message.
    pub async fn turn(&mut self, utterance: &str, final_instruction: &str) -> Result<TurnOutcome> {
        self.conversation.push(Message::user(utterance));
        let schemas = self.tools.definitions();

        let mut tool_rounds = 0;
        let mut hit_round_limit = false;
        let mut step = Step::AwaitModel {
            advertise_tools: true,
        };

        loop {
            step = match step {
                Step::AwaitModel { advertise_tools } => {
                    let tools = advertise_tools.then_some(schemas.as_slice());
                    let calls = self.request_tool_calls(tools).await?;
                    if calls.is_empty() {
                        Step::Finalize
                    } else {
                        Step::ExecuteTools(calls)
                    }
                }
                Step::ExecuteTools(calls) => {
                    if self.max_tool_rounds.is_some_and(|limit| tool_rounds >= limit) {
                        tracing::warn!(
                            rounds = tool_rounds,
                            pending = calls.len(),
                            "tool round limit reached, finalizing"
                        );
                        hit_round_limit = true;
                        Step::Finalize
                    } else {
                        tool_rounds += 1;
                        self.execute(calls, utterance).await?;
                        Step::AwaitModel {
                            advertise_tools: false,
                        }
                    }
                }
                Step::Finalize => break,
            };
        }

        let outcome = TurnOutcome {
            answer: self.finalize(final_instruction).await?,
            tool_rounds,
            hit_round_limit,
        };
        tracing::debug!(
            rounds = outcome.tool_rounds,
            round_limited = outcome.hit_round_limit,
            tool_results = self.conversation.tool_result_count(),
            "turn finished"
        );
        Ok(outcome)
    }

    async fn request_tool_calls(
        &self,
        tools: Option<&[ToolDefinition]>,
    ) -> Result<Vec<ToolInvocation>> {
        let response = self
            .transport
            .chat(&self.model, self.conversation.messages(), tools)
            .await
            .with_context(|| format!("Request to model `{}` failed", self.model))?;
        let normalized = normalize::normalize(response.content());
        let parsed = extract::decode(&response, &normalized);
        tracing::debug!(
            source = parsed.source(),
            entries = parsed.entries().len(),
            history = self.conversation.len(),
            "model replied"
        );
        Ok(parsed.into_invocations())
    }

    /// Runs each call in order. Names the registry does not know are skipped.
    async fn execute(&mut self, calls: Vec<ToolInvocation>, utterance: &str) -> Result<()> {
        for call in calls {
            let Some(tool) = self.tools.resolve(&call.name) else {
                tracing::debug!(tool = %call.name, "skipping unknown tool");
                continue;
            };
            tracing::info!(tool = tool.name(), requested = %call.name, "running tool");
            let output = repair::invoke(tool.as_ref(), &call.arguments, utterance)
                .await
                .with_context(|| format!("Tool `{}` failed", tool.name()))?;
            self.conversation.push(Message::tool(output));
        }
        Ok(())
    }

    async fn finalize(&mut self, instruction: &str) -> Result<String> {
        self.conversation.push(Message::system(instruction));
        let response = self
            .transport
            .chat(&self.model, self.conversation.messages(), None)
            .await
            .with_context(|| format!("Request to model `{}` failed", self.model))?;
        Ok(response.content().trim().to_string())
    }
}
