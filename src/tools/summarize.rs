use serde_json::{json, Value};

use super::prompted::PromptRunner;
use super::{required_str, Arguments, Tool, ToolError};

pub struct SummarizeTool {
    runner: PromptRunner,
}

impl SummarizeTool {
    pub fn new(runner: PromptRunner) -> Self {
        Self { runner }
    }
}

#[async_trait::async_trait]
impl Tool for SummarizeTool {
    fn name(&self) -> &str {
        "summarize_paper"
    }

    fn description(&self) -> &str {
        "Summarize a research paper text."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The full text or excerpt of a research paper."
                }
            },
            "required": ["text"]
        })
    }

    fn uses_utterance_fallback(&self) -> bool {
        true
    }

    async fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let text = required_str(args, "text")?;
        self.runner
            .complete(format!(
                "Summarize the following research paper text in a concise paragraph:\n\n{text}"
            ))
            .await
    }
}
