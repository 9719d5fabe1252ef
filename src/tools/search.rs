use std::sync::Arc;

use serde_json::{json, Value};

use super::{required_str, Arguments, Tool, ToolError};
use crate::retrieval::Retriever;

/// Retrieves paper excerpts relevant to a query.
pub struct SearchTool {
    retriever: Arc<dyn Retriever>,
}

impl SearchTool {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait::async_trait]
impl Tool for SearchTool {
    fn name(&self) -> &str {
        "get_search_results"
    }

    fn description(&self) -> &str {
        "Retrieve research papers relevant to a query."
    }

    fn schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query for research papers."
                }
            },
            "required": ["query"]
        })
    }

    fn synonyms(&self) -> &[&'static str] {
        &[
            "retrieve_paper",
            "get_research_papers",
            "search_papers",
            "retrieve_research_papers",
        ]
    }

    async fn execute(&self, args: &Arguments) -> Result<String, ToolError> {
        let query = required_str(args, "query")?;
        // Retriever problems come back as text for the model to read.
        let results = self.retriever.search(query);
        Ok(format!("Retrieved research content:\n{results}"))
    }
}
