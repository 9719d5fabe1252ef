//! Permissive parser for Python-style data literals.
//!
//! Models sometimes answer with `{'tool_calls': [{'name': 'x'}]}` or use
//! `True`/`None`, none of which is JSON. This parser accepts mappings,
//! sequences (lists and tuples), strings in either quote style, numbers,
//! booleans, and null, and produces a [`serde_json::Value`]. Nothing is ever
//! evaluated: any other token is a parse error.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Nesting bound, so hostile input cannot exhaust the stack.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Error, PartialEq)]
pub enum LiteralError {
    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },

    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    #[error("trailing characters at offset {0}")]
    TrailingCharacters(usize),

    #[error("nesting deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

impl LiteralError {
    /// True when the input simply ran out, as with truncated output.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof)
    }
}

/// Parses one literal spanning the whole input (surrounding whitespace allowed).
pub fn parse(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser { src: input, pos: 0 };
    let value = parser.value(0)?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(LiteralError::TrailingCharacters(parser.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn unexpected(&self, found: char) -> LiteralError {
        LiteralError::Unexpected {
            found,
            offset: self.pos,
        }
    }

    fn expect_more(&self) -> Result<char, LiteralError> {
        self.peek().ok_or(LiteralError::UnexpectedEof)
    }

    fn value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        if depth > MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }
        self.skip_ws();
        match self.expect_more()? {
            '{' => self.mapping(depth),
            '[' => self.sequence(']', depth),
            '(' => self.sequence(')', depth),
            '\'' | '"' => self.string().map(Value::String),
            c if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            c if is_ident_start(c) => {
                let offset = self.pos;
                match self.identifier() {
                    "True" | "true" => Ok(Value::Bool(true)),
                    "False" | "false" => Ok(Value::Bool(false)),
                    "None" | "null" => Ok(Value::Null),
                    _ => Err(LiteralError::Unexpected { found: c, offset }),
                }
            }
            c => Err(self.unexpected(c)),
        }
    }

    fn mapping(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.bump(); // {
        let mut map = Map::new();
        loop {
            self.skip_ws();
            if self.expect_more()? == '}' {
                self.bump();
                return Ok(Value::Object(map));
            }
            let key = self.key()?;
            self.skip_ws();
            match self.expect_more()? {
                ':' => {
                    self.bump();
                }
                c => return Err(self.unexpected(c)),
            }
            let value = self.value(depth + 1)?;
            map.insert(key, value);
            self.skip_ws();
            match self.expect_more()? {
                ',' => {
                    self.bump();
                }
                '}' => {
                    self.bump();
                    return Ok(Value::Object(map));
                }
                c => return Err(self.unexpected(c)),
            }
        }
    }

    /// Mapping keys: quoted strings, bare identifiers, or numbers.
    fn key(&mut self) -> Result<String, LiteralError> {
        match self.expect_more()? {
            '\'' | '"' => self.string(),
            c if is_ident_start(c) => Ok(self.identifier().to_string()),
            c if c == '-' || c.is_ascii_digit() => match self.number()? {
                Value::Number(n) => Ok(n.to_string()),
                _ => Err(self.unexpected(c)),
            },
            c => Err(self.unexpected(c)),
        }
    }

    fn sequence(&mut self, close: char, depth: usize) -> Result<Value, LiteralError> {
        self.bump(); // [ or (
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.expect_more()? == close {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value(depth + 1)?);
            self.skip_ws();
            match self.expect_more()? {
                ',' => {
                    self.bump();
                }
                c if c == close => {
                    self.bump();
                    return Ok(Value::Array(items));
                }
                c => return Err(self.unexpected(c)),
            }
        }
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEof)?;
        let mut out = String::new();
        loop {
            let c = self.bump().ok_or(LiteralError::UnexpectedEof)?;
            match c {
                c if c == quote => return Ok(out),
                '\\' => {
                    let escaped = self.bump().ok_or(LiteralError::UnexpectedEof)?;
                    match escaped {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        '\\' | '\'' | '"' | '/' => out.push(escaped),
                        'u' => out.push(self.hex_escape(4)?),
                        'x' => out.push(self.hex_escape(2)?),
                        other => {
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        for _ in 0..digits {
            let c = self.bump().ok_or(LiteralError::UnexpectedEof)?;
            if !c.is_ascii_hexdigit() {
                return Err(LiteralError::Unexpected {
                    found: c,
                    offset: self.pos - c.len_utf8(),
                });
            }
        }
        let code = u32::from_str_radix(&self.src[start..self.pos], 16)
            .map_err(|_| LiteralError::InvalidNumber(self.src[start..self.pos].to_string()))?;
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'))
        {
            self.bump();
        }
        let text: String = self.src[start..self.pos].chars().filter(|&c| c != '_').collect();
        let text = text.strip_prefix('+').unwrap_or(&text);

        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(i.into()));
        }
        if let Ok(u) = text.parse::<u64>() {
            return Ok(Value::Number(u.into()));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError::InvalidNumber(text.to_string()))
    }

    fn identifier(&mut self) -> &str {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.bump();
        }
        &self.src[start..self.pos]
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_python_dict() {
        let value = parse("{'tool_calls': [{'name': 'search_papers', 'parameters': {'query': 'qubits', 'limit': 3}}]}")
            .unwrap();
        assert_eq!(
            value,
            json!({"tool_calls": [{"name": "search_papers", "parameters": {"query": "qubits", "limit": 3}}]})
        );
    }

    #[test]
    fn test_python_keywords_tuples_and_trailing_commas() {
        let value = parse("{'a': True, 'b': None, 'c': (1, 2.5,), 'd': False,}").unwrap();
        assert_eq!(value, json!({"a": true, "b": null, "c": [1, 2.5], "d": false}));
    }

    #[test]
    fn test_bare_keys_and_escapes() {
        let value = parse(r#"{name: 'it\'s', "path": "a\\b\n", n: -4}"#).unwrap();
        assert_eq!(value, json!({"name": "it's", "path": "a\\b\n", "n": -4}));
    }

    #[test]
    fn test_truncation_is_eof() {
        assert!(parse("{'a': {'b': 1").unwrap_err().is_eof());
        assert!(parse("{'a': 'unterminated").unwrap_err().is_eof());
        assert!(parse("").unwrap_err().is_eof());
    }

    #[test]
    fn test_rejects_expressions() {
        assert!(parse("__import__('os').system('ls')").is_err());
        assert!(parse("{'a': open('x')}").is_err());
        assert!(parse("{'a': 1} + {'b': 2}").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 2) + &"]".repeat(MAX_DEPTH + 2);
        assert_eq!(parse(&deep), Err(LiteralError::TooDeep));
    }
}
