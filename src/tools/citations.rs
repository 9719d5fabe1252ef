use serde_json::{json, Value};

use super::prompted::PromptRunner;
use super::{required_str, Arguments, Tool, ToolError};

pub struct AnalyzeCitationsTool {
    runner: PromptRunner,
}

impl AnalyzeCitationsTool {
    pub fn new(runner: PromptRunner) -> Self {
        Self { runner }
    }
}

#[async_trait::async_trait]
impl Tool for AnalyzeCitationsTool {
    fn name(&self) -> &str {
        "analyze_citations"
    }

    fn description(&self) -> &str {
        "Analyze the citations within a research paper text."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text containing citations to analyze."
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
                "Analyze the citations in the following research paper excerpt. \
Identify key references and explain their significance.\n\n{text}"
            ))
            .await
    }
}
