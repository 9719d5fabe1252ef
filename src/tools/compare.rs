use serde_json::{json, Value};

use super::prompted::PromptRunner;
use super::{required_str, Arguments, Tool, ToolError};

pub struct ComparePapersTool {
    runner: PromptRunner,
}

impl ComparePapersTool {
    pub fn new(runner: PromptRunner) -> Self {
        Self { runner }
    }
}

#[async_trait::async_trait]
impl Tool for ComparePapersTool {
    fn name(&self) -> &str {
        "compare_papers"
    }

    fn description(&self) -> &str {
        "Compare two research paper texts."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text1": {
                    "type": "string",
                    "description": "Text from the first research paper."
                },
                "text2": {
                    "type": "string",
                    "description": "Text from the second research paper."
                }
            },
            "required": ["text1", "text2"]
        })
    }

    async fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let text1 = required_str(args, "text1")?;
        let text2 = required_str(args, "text2")?;
        self.runner
            .complete(format!(
                "Compare the following two research paper excerpts. \
Highlight the main similarities and differences.\n\nText 1:\n{text1}\n\nText 2:\n{text2}"
            ))
            .await
    }
}
