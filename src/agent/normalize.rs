//! Turns free-form model text into a structured mapping.
//!
//! Never fails: when no object can be recovered the result is an empty map.

use serde_json::error::Category;
use serde_json::{Map, Value};

use super::literal;
use crate::constants::MAX_BRACE_REPAIRS;

/// Outcome of one parse attempt.
enum Attempt {
    Object(Map<String, Value>),
    /// Input ended before the value did.
    Truncated,
    Invalid,
}

/// Best-effort conversion of model text into a mapping.
///
/// In order: strict JSON on the trimmed text; strict JSON after stripping
/// wrapping backticks, quotes, and a `json` fence tag; the literal parser on
/// the same candidates. Truncated input is retried with up to
/// [`MAX_BRACE_REPAIRS`] closing braces appended. Only objects count as
/// success.
pub fn normalize(text: &str) -> Map<String, Value> {
    normalize_at(text, 0)
}

fn normalize_at(text: &str, depth: usize) -> Map<String, Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Map::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => return map,
        // A JSON string holding JSON: unwrap one level.
        Ok(Value::String(inner)) if depth == 0 => return normalize_at(&inner, depth + 1),
        _ => {}
    }

    let stripped = strip_wrapping(trimmed);
    let mut candidates = vec![trimmed];
    if stripped != trimmed && !stripped.is_empty() {
        candidates.push(stripped);
    }

    for parse in [parse_json as fn(&str) -> Attempt, parse_literal] {
        for candidate in &candidates {
            if let Some(map) = with_brace_repair(candidate, parse) {
                return map;
            }
        }
    }

    tracing::trace!(len = trimmed.len(), "no structured object in model text");
    Map::new()
}

/// Removes surrounding backticks and double quotes, then a leading `json`
/// language tag.
fn strip_wrapping(text: &str) -> &str {
    let text = text.trim_matches(|c| c == '`' || c == '"').trim();
    match text.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => text[4..].trim_start(),
        _ => text,
    }
}

fn with_brace_repair(text: &str, parse: fn(&str) -> Attempt) -> Option<Map<String, Value>> {
    let mut candidate = text.to_string();
    for appended in 0..=MAX_BRACE_REPAIRS {
        match parse(&candidate) {
            Attempt::Object(map) => {
                if appended > 0 {
                    tracing::debug!(appended, "repaired truncated model output");
                }
                return Some(map);
            }
            Attempt::Truncated => candidate.push('}'),
            Attempt::Invalid => return None,
        }
    }
    None
}

fn parse_json(text: &str) -> Attempt {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Attempt::Object(map),
        Ok(_) => Attempt::Invalid,
        Err(e) if e.classify() == Category::Eof => Attempt::Truncated,
        Err(_) => Attempt::Invalid,
    }
}

fn parse_literal(text: &str) -> Attempt {
    match literal::parse(text) {
        Ok(Value::Object(map)) => Attempt::Object(map),
        Ok(_) => Attempt::Invalid,
        Err(e) if e.is_eof() => Attempt::Truncated,
        Err(_) => Attempt::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_plain_json_object() {
        let text = r#"  {"tool_calls": [{"name": "search_papers", "parameters": {"query": "qubits"}}]}  "#;
        assert_eq!(
            normalize(text),
            obj(json!({"tool_calls": [{"name": "search_papers", "parameters": {"query": "qubits"}}]}))
        );
    }

    #[test]
    fn test_code_fence() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(normalize(text), obj(json!({"a": 1})));
    }

    #[test]
    fn test_json_encoded_string() {
        let text = r#""{\"a\": {\"b\": true}}""#;
        assert_eq!(normalize(text), obj(json!({"a": {"b": true}})));
    }

    #[test]
    fn test_python_literal() {
        let text = "{'tool_calls': [{'function_name': 'summarize_paper', 'arguments': {'text': None}}]}";
        assert_eq!(
            normalize(text),
            obj(json!({"tool_calls": [{"function_name": "summarize_paper", "arguments": {"text": null}}]}))
        );
    }

    #[test]
    fn test_truncated_braces_are_restored() {
        let full = json!({
            "tool_calls": {"name": "search_papers", "parameters": {"query": "quantum \"error\" correction"}}
        });
        let serialized = serde_json::to_string(&full).unwrap();
        for k in 0..=3 {
            let truncated = &serialized[..serialized.len() - k];
            assert_eq!(normalize(truncated), obj(full.clone()), "k = {k}");
        }
    }

    #[test]
    fn test_every_missing_brace_up_to_limit_is_restored() {
        let full = json!({"a": {"b": {"c": {"d": {"e": 1}}}}});
        let serialized = serde_json::to_string(&full).unwrap();
        for k in 0..=MAX_BRACE_REPAIRS {
            let truncated = &serialized[..serialized.len() - k];
            assert_eq!(normalize(truncated), obj(full.clone()), "bare, k = {k}");

            let fenced = format!("```json\n{truncated}");
            assert_eq!(normalize(&fenced), obj(full.clone()), "fenced, k = {k}");
        }

        let literal = "{'a': {'b': {'c': {'d': {'e': 1";
        assert_eq!(normalize(literal), obj(full));
    }

    #[test]
    fn test_truncated_python_literal_is_restored() {
        let text = "{'tool_calls': {'name': 'analyze_citations', 'parameters': {'text': 'x'";
        assert_eq!(
            normalize(text),
            obj(json!({"tool_calls": {"name": "analyze_citations", "parameters": {"text": "x"}}}))
        );
    }

    #[test]
    fn test_repair_gives_up_after_limit() {
        let text = format!("{}1", "{\"x\": ".repeat(MAX_BRACE_REPAIRS + 1));
        assert!(normalize(&text).is_empty());
    }

    #[test]
    fn test_unparseable_text_is_empty() {
        assert!(normalize("").is_empty());
        assert!(normalize("Quantum computers use qubits.").is_empty());
        assert!(normalize("[1, 2, 3]").is_empty());
        assert!(normalize("\"just a string\"").is_empty());
        assert!(normalize("{oops: ]").is_empty());
    }
}
