//! Token counting for the usage line shown after answers.
//!
//! Uses tiktoken-rs. OpenAI models get their exact tokenizer; everything
//! else is approximated with cl100k_base.

use anyhow::Result;
use colored::Colorize;
use tiktoken_rs::{get_bpe_from_model, CoreBPE};

use crate::constants::{TOKENS_CONVERSATION_FRAMING, TOKENS_PER_MESSAGE_OVERHEAD};
use crate::conversation::Conversation;
use crate::models::context_window;

pub const WARN_THRESHOLD: f64 = 0.80;

fn tokenizer(model: &str) -> Result<CoreBPE> {
    get_bpe_from_model(model).or_else(|_| tiktoken_rs::cl100k_base())
}

/// Approximate tokens the conversation costs on the next request.
pub fn conversation_tokens(conversation: &Conversation, model: &str) -> Result<usize> {
    let bpe = tokenizer(model)?;
    let body: usize = conversation
        .messages()
        .iter()
        .map(|m| TOKENS_PER_MESSAGE_OVERHEAD + bpe.encode_ordinary(m.text()).len())
        .sum();
    Ok(body + TOKENS_CONVERSATION_FRAMING)
}

pub enum ContextStatus {
    Ok { used: usize, limit: usize },
    Warning { used: usize, limit: usize, percent: u8 },
}

pub fn check_context_usage(used: usize, model: &str) -> ContextStatus {
    let limit = context_window(model);
    let ratio = used as f64 / limit as f64;
    if ratio >= WARN_THRESHOLD {
        ContextStatus::Warning {
            used,
            limit,
            percent: (ratio * 100.0).min(255.0) as u8,
        }
    } else {
        ContextStatus::Ok { used, limit }
    }
}

/// Prints the dimmed usage line shown after an answer.
pub fn print_usage(conversation: &Conversation, model: &str) {
    let used = match conversation_tokens(conversation, model) {
        Ok(used) => used,
        Err(e) => {
            tracing::debug!(error = %e, "token counting unavailable");
            return;
        }
    };
    match check_context_usage(used, model) {
        ContextStatus::Ok { used, limit } => {
            println!("{}", format!("Tokens: {}", format_token_usage(used, limit)).dimmed());
        }
        ContextStatus::Warning {
            used,
            limit,
            percent,
        } => {
            println!(
                "{}",
                format!(
                    "Tokens: {} ({}%) -- the model may start losing early context",
                    format_token_usage(used, limit),
                    percent,
                )
                .yellow()
            );
        }
    }
}

/// "1,234 / 128,000"
pub fn format_token_usage(used: usize, limit: usize) -> String {
    format!("{} / {}", format_number(used), format_number(limit))
}

fn format_number(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_047_576), "1,047,576");
        assert_eq!(format_token_usage(1234, 8192), "1,234 / 8,192");
    }

    #[test]
    fn test_conversation_tokens_grow_with_messages() {
        let mut conversation = Conversation::new("You are a research assistant.");
        let before = conversation_tokens(&conversation, "llama3.1:8b").unwrap();
        assert!(before > TOKENS_PER_MESSAGE_OVERHEAD + TOKENS_CONVERSATION_FRAMING);

        conversation.push(Message::user("Summarize quantum computing papers"));
        let after = conversation_tokens(&conversation, "llama3.1:8b").unwrap();
        assert!(after > before + TOKENS_PER_MESSAGE_OVERHEAD);
    }

    #[test]
    fn test_context_status() {
        assert!(matches!(
            check_context_usage(100, "unknown-model"),
            ContextStatus::Ok { limit: 8_192, .. }
        ));
        assert!(matches!(
            check_context_usage(7_000, "unknown-model"),
            ContextStatus::Warning { percent: 85, .. }
        ));
    }
}
