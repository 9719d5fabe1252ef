//! Argument repair around a single tool invocation.
//!
//! Small models routinely call `summarize_paper` with no `text`, or with
//! arguments named after some other tool. Two fixes apply:
//!
//! - Before the call, a tool that opts into the utterance fallback gets the
//!   user's utterance as `text` when `text` is missing or blank.
//! - When a call fails on its arguments, it is retried exactly once with
//!   `text` set to the utterance. A second failure is returned as is.
//!
//! The model's argument map is never modified; repairs work on copies.

use std::borrow::Cow;

use serde_json::Value;

use crate::tools::{Arguments, Tool, ToolError};

/// Runs `tool`, applying the utterance fallback and the single retry.
pub async fn invoke(tool: &dyn Tool, args: &Arguments, utterance: &str) -> Result<String, ToolError> {
    let prepared: Cow<'_, Arguments> = if tool.uses_utterance_fallback() && text_is_missing(args) {
        tracing::debug!(tool = tool.name(), "filling `text` from the user's utterance");
        Cow::Owned(with_text(args, utterance))
    } else {
        Cow::Borrowed(args)
    };

    match tool.execute(&prepared).await {
        Err(e) if e.is_argument_error() => {
            tracing::debug!(tool = tool.name(), error = %e, "retrying once with the user's utterance");
            tool.execute(&with_text(&prepared, utterance)).await
        }
        result => result,
    }
}

/// Missing, null, blank, or an empty collection.
fn text_is_missing(args: &Arguments) -> bool {
    match args.get("text") {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    }
}

fn with_text(args: &Arguments, utterance: &str) -> Arguments {
    let mut repaired = args.clone();
    repaired.insert("text".to_string(), Value::String(utterance.to_string()));
    repaired
}
