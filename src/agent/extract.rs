//! Finds tool-call requests in a model reply.
//!
//! Models report tool calls in several shapes. Candidates are taken from the
//! first source that has any:
//!
//! 1. the response's own `tool_calls` field,
//! 2. a `tool_calls` key inside the normalized text,
//! 3. entries of a `tools` list that look like calls.
//!
//! Each candidate is then read as one of the known call layouts:
//!
//! ```text
//! {"function_name": N, "arguments": A}
//! {"function": {"name": N, "arguments" | "parameters": A}}
//! {"name": N, "parameters" | "arguments": A}
//! {"function": N, "arguments": A}
//! ```

use serde_json::{Map, Value};

use super::normalize::normalize;
use crate::provider::RawResponse;
use crate::tools::Arguments;

/// Raw call entries, tagged with where they were found.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedToolCalls {
    /// The response's `tool_calls` field.
    Direct(Vec<Value>),
    /// `tool_calls` recovered from the reply text.
    FromText(Vec<Value>),
    /// Call-shaped entries of a `tools` list.
    FromToolsList(Vec<Value>),
    None,
}

/// A single request to run a named tool.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: Arguments,
}

impl ParsedToolCalls {
    pub fn source(&self) -> &'static str {
        match self {
            Self::Direct(_) => "response",
            Self::FromText(_) => "text",
            Self::FromToolsList(_) => "tools_list",
            Self::None => "none",
        }
    }

    pub fn entries(&self) -> &[Value] {
        match self {
            Self::Direct(e) | Self::FromText(e) | Self::FromToolsList(e) => e,
            Self::None => &[],
        }
    }

    /// Reads each entry as a call. Entries without a usable name are dropped.
    pub fn into_invocations(self) -> Vec<ToolInvocation> {
        self.entries().iter().filter_map(read_invocation).collect()
    }
}

/// Collects candidate call entries from `response`.
///
/// `normalized` is the normalizer's reading of the response text.
pub fn decode(response: &RawResponse, normalized: &Map<String, Value>) -> ParsedToolCalls {
    let (entries, direct) = match response.tool_calls() {
        Some(raw) => (as_entries(raw), true),
        None => (
            normalized.get("tool_calls").map(as_entries).unwrap_or_default(),
            false,
        ),
    };
    if !entries.is_empty() {
        return if direct {
            ParsedToolCalls::Direct(entries)
        } else {
            ParsedToolCalls::FromText(entries)
        };
    }

    let listed: Vec<Value> = response
        .tools()
        .map(|tools| tools.iter().filter(|t| looks_like_call(t)).cloned().collect())
        .unwrap_or_default();
    if !listed.is_empty() {
        return ParsedToolCalls::FromToolsList(listed);
    }

    ParsedToolCalls::None
}

/// Flattens a raw `tool_calls` value into a list of mappings.
fn as_entries(raw: &Value) -> Vec<Value> {
    match raw {
        Value::Array(items) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(_) => vec![item.clone()],
                Value::String(_) => as_entries(item),
                _ => Vec::new(),
            })
            .collect(),
        Value::Object(_) => vec![raw.clone()],
        Value::String(text) => {
            if let Ok(list @ Value::Array(_)) = serde_json::from_str::<Value>(text.trim()) {
                return as_entries(&list);
            }
            let mut map = normalize(text);
            match map.remove("tool_calls") {
                Some(inner) => as_entries(&inner),
                None if map.is_empty() => Vec::new(),
                None => vec![Value::Object(map)],
            }
        }
        _ => Vec::new(),
    }
}

fn looks_like_call(entry: &Value) -> bool {
    entry.get("function_name").is_some()
        || entry
            .get("function")
            .and_then(Value::as_object)
            .is_some_and(|f| f.contains_key("name"))
}

fn read_invocation(entry: &Value) -> Option<ToolInvocation> {
    let obj = entry.as_object()?;
    let (name, raw_args) = if let Some(name) = obj.get("function_name") {
        (name, obj.get("arguments"))
    } else if let Some(function) = obj.get("function").and_then(Value::as_object) {
        (
            function.get("name")?,
            function.get("arguments").or_else(|| function.get("parameters")),
        )
    } else if let Some(name) = obj.get("name") {
        (name, obj.get("parameters").or_else(|| obj.get("arguments")))
    } else {
        (obj.get("function")?, obj.get("arguments"))
    };

    let name = name.as_str()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(ToolInvocation {
        name: name.to_string(),
        arguments: read_arguments(raw_args),
    })
}

/// Arguments may arrive as an object or as serialized text; anything else
/// reads as no arguments.
fn read_arguments(raw: Option<&Value>) -> Arguments {
    match raw {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) => normalize(text),
        _ => Arguments::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(response: &RawResponse, normalized: &Map<String, Value>) -> Vec<ToolInvocation> {
        decode(response, normalized).into_invocations()
    }

    fn response(value: Value) -> RawResponse {
        RawResponse::new(value)
    }

    fn call(name: &str, arguments: Value) -> ToolInvocation {
        ToolInvocation {
            name: name.to_string(),
            arguments: arguments.as_object().cloned().unwrap_or_default(),
        }
    }

    #[test]
    fn test_all_layouts_yield_the_same_call() {
        let layouts = [
            json!({"function_name": "search_papers", "arguments": {"query": "qubits"}}),
            json!({"function": {"name": "search_papers", "arguments": {"query": "qubits"}}}),
            json!({"function": {"name": "search_papers", "parameters": {"query": "qubits"}}}),
            json!({"name": "search_papers", "parameters": {"query": "qubits"}}),
            json!({"name": "search_papers", "arguments": {"query": "qubits"}}),
            json!({"function": "search_papers", "arguments": {"query": "qubits"}}),
            json!({"function": {"name": "search_papers", "arguments": "{\"query\": \"qubits\"}"}}),
        ];
        for layout in layouts {
            let calls = extract(&response(json!({"tool_calls": [layout.clone()]})), &Map::new());
            assert_eq!(calls, vec![call("search_papers", json!({"query": "qubits"}))], "{layout}");
        }
    }

    #[test]
    fn test_single_mapping_is_wrapped() {
        let normalized = normalize(r#"{"tool_calls": {"name": "summarize_paper", "parameters": {"text": "abc"}}}"#);
        let parsed = decode(&RawResponse::from_text(""), &normalized);
        assert!(matches!(parsed, ParsedToolCalls::FromText(_)));
        assert_eq!(
            parsed.into_invocations(),
            vec![call("summarize_paper", json!({"text": "abc"}))]
        );
    }

    #[test]
    fn test_tool_calls_as_serialized_string() {
        let raw = response(json!({
            "tool_calls": "[{\"name\": \"analyze_citations\", \"parameters\": {\"text\": \"refs\"}}]"
        }));
        assert_eq!(
            extract(&raw, &Map::new()),
            vec![call("analyze_citations", json!({"text": "refs"}))]
        );

        let raw = response(json!({
            "tool_calls": "{\"name\": \"analyze_citations\", \"parameters\": {\"text\": \"refs\"}}"
        }));
        assert_eq!(
            extract(&raw, &Map::new()),
            vec![call("analyze_citations", json!({"text": "refs"}))]
        );
    }

    #[test]
    fn test_response_field_wins_over_text() {
        let normalized = normalize(r#"{"tool_calls": [{"name": "from_text"}]}"#);
        let raw = response(json!({"tool_calls": [{"name": "from_field"}]}));
        let parsed = decode(&raw, &normalized);
        assert_eq!(parsed.source(), "response");
        assert_eq!(parsed.into_invocations()[0].name, "from_field");
    }

    #[test]
    fn test_present_but_empty_field_shadows_text() {
        let normalized = normalize(r#"{"tool_calls": [{"name": "from_text"}]}"#);
        let raw = response(json!({"tool_calls": []}));
        assert_eq!(decode(&raw, &normalized), ParsedToolCalls::None);
    }

    #[test]
    fn test_tools_list_fallback() {
        let raw = response(json!({
            "tool_calls": [],
            "tools": [
                {"function_name": "search_papers", "arguments": {"query": "lasers"}},
                {"function": {"name": "compare_papers", "arguments": {"text1": "a", "text2": "b"}}},
                {"type": "function", "description": "not a call"}
            ]
        }));
        let parsed = decode(&raw, &Map::new());
        assert_eq!(parsed.source(), "tools_list");
        assert_eq!(
            parsed.into_invocations(),
            vec![
                call("search_papers", json!({"query": "lasers"})),
                call("compare_papers", json!({"text1": "a", "text2": "b"})),
            ]
        );
    }

    #[test]
    fn test_entries_without_names_are_dropped() {
        let raw = response(json!({"tool_calls": [
            {"arguments": {"query": "x"}},
            {"name": ""},
            {"name": 7},
            "not a call",
            {"name": "search_papers", "parameters": "garbage"}
        ]}));
        assert_eq!(
            extract(&raw, &Map::new()),
            vec![call("search_papers", json!({}))]
        );
    }

    #[test]
    fn test_no_calls() {
        let raw = RawResponse::from_text("Qubits are two-level systems.");
        let normalized = normalize(raw.content());
        assert_eq!(decode(&raw, &normalized), ParsedToolCalls::None);
    }
}
