//! Research tools and the registry that resolves tool names to them.
//!
//! Each tool declares a canonical name, optional synonyms, and a JSON schema.
//! The [`ToolRegistry`] maps every canonical name and synonym to exactly one
//! tool and produces the [`ToolDefinition`]s advertised to the model.

pub mod citations;
pub mod compare;
pub mod prompted;
pub mod search;
pub mod summarize;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::provider::ModelTransport;
use crate::retrieval::Retriever;

use citations::AnalyzeCitationsTool;
use compare::ComparePapersTool;
use prompted::PromptRunner;
use search::SearchTool;
use summarize::SummarizeTool;

/// Tool arguments as a JSON object.
pub type Arguments = Map<String, Value>;

/// Why a tool invocation failed.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing required argument `{0}`")]
    MissingArgument(String),

    #[error("argument `{name}` must be {expected}")]
    InvalidArgument { name: String, expected: &'static str },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl ToolError {
    /// True for failures caused by the shape of the arguments rather than by
    /// the work the tool does.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::MissingArgument(_) | Self::InvalidArgument { .. }
        )
    }
}

/// Definition sent to the model so it knows what tools are available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value, // JSON Schema
}

impl ToolDefinition {
    /// The `{"type": "function", "function": {...}}` wire shape.
    pub fn to_function_spec(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    /// Names listed under the schema's `required` array.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// Every tool implements this trait.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Canonical name advertised to the model.
    fn name(&self) -> &str;

    /// Human-readable description for the model.
    fn description(&self) -> &str;

    /// JSON Schema describing the tool's input parameters.
    fn schema(&self) -> Value;

    /// Other names the model may use for this tool.
    fn synonyms(&self) -> &[&'static str] {
        &[]
    }

    /// Whether a missing `text` argument should be filled with the user's
    /// utterance for the current turn.
    fn uses_utterance_fallback(&self) -> bool {
        false
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: &Arguments) -> Result<String, ToolError>;
}

/// Reads a required string argument.
pub(crate) fn required_str<'a>(args: &'a Arguments, name: &str) -> Result<&'a str, ToolError> {
    match args.get(name) {
        None | Some(Value::Null) => Err(ToolError::MissingArgument(name.to_string())),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(ToolError::InvalidArgument {
            name: name.to_string(),
            expected: "a string",
        }),
    }
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("tool name `{0}` is already registered")]
    DuplicateName(String),
}

/// Holds all registered tools and resolves names, including synonyms.
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    /// Canonical names and synonyms, each pointing at an index in `tools`.
    names: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            names: HashMap::new(),
        }
    }

    /// Register a tool under its canonical name and all of its synonyms.
    ///
    /// Fails without registering anything if any of those names is taken.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<(), RegistryError> {
        let mut names: Vec<String> = vec![tool.name().to_string()];
        names.extend(tool.synonyms().iter().map(|s| s.to_string()));
        for (i, name) in names.iter().enumerate() {
            if self.names.contains_key(name) || names[..i].contains(name) {
                return Err(RegistryError::DuplicateName(name.clone()));
            }
        }
        let index = self.tools.len();
        self.tools.push(Arc::from(tool));
        for name in names {
            self.names.insert(name, index);
        }
        Ok(())
    }

    /// Look up a tool by canonical name or synonym.
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.names
            .get(name)
            .map(|&index| Arc::clone(&self.tools[index]))
    }

    /// Produce definitions for the model, one per canonical tool.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                parameters: t.schema(),
            })
            .collect()
    }

    /// Registered tools in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// How many tools are registered.
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    /// Create a registry with the four research tools.
    ///
    /// Search goes through `retriever`; summarize, compare, and citation
    /// analysis are prompt-templated calls to `model` over `transport`.
    pub fn with_research_tools(
        transport: Arc<dyn ModelTransport>,
        model: impl Into<String>,
        retriever: Arc<dyn Retriever>,
    ) -> Result<Self> {
        let runner = PromptRunner::new(transport, model);
        let mut registry = Self::new();
        registry.register(Box::new(SearchTool::new(retriever)))?;
        registry.register(Box::new(SummarizeTool::new(runner.clone())))?;
        registry.register(Box::new(ComparePapersTool::new(runner.clone())))?;
        registry.register(Box::new(AnalyzeCitationsTool::new(runner)))?;
        Ok(registry)
    }
}
