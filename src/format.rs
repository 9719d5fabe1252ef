use colored::Colorize;

use crate::message::{Message, Role};

/// Format a message for terminal display with role label and colors.
pub fn format_message(msg: &Message) -> String {
    format!("{}\n{}", role_label(msg.role), format_body(msg))
}

fn role_label(role: Role) -> String {
    match role {
        Role::User => "you:".green().bold().to_string(),
        Role::Assistant => "papertrail:".cyan().bold().to_string(),
        Role::System => "system:".dimmed().to_string(),
        Role::Tool => "tool result:".yellow().to_string(),
    }
}

fn format_body(msg: &Message) -> String {
    match msg.role {
        Role::User => msg.text().to_string(),
        Role::Assistant => render_markdown_lite(msg.text()),
        Role::Tool => truncate_lines(msg.text(), TOOL_PREVIEW_LINES).dimmed().to_string(),
        Role::System => msg.text().dimmed().to_string(),
    }
}

/// Tool results can be whole retrieved passages; history shows the head.
const TOOL_PREVIEW_LINES: usize = 8;

fn truncate_lines(text: &str, max: usize) -> String {
    let total = text.lines().count();
    if total <= max {
        return text.to_string();
    }
    let head: Vec<&str> = text.lines().take(max).collect();
    format!("{}\n... ({} more lines)", head.join("\n"), total - max)
}

/// Minimal markdown renderer for terminal output.
/// Handles **bold**, `inline code`, `#` headings, and fenced code blocks.
pub fn render_markdown_lite(text: &str) -> String {
    let mut lines = Vec::new();
    let mut in_code_block = false;

    for line in text.lines() {
        if let Some(lang) = line.strip_prefix("```") {
            in_code_block = !in_code_block;
            if in_code_block && !lang.trim().is_empty() {
                lines.push(format!("  {}", lang.trim().dimmed()));
            }
            continue;
        }

        if in_code_block {
            lines.push(format!("  {}", line.dimmed()));
        } else if let Some(heading) = heading_text(line) {
            lines.push(heading.bold().underline().to_string());
        } else {
            lines.push(render_inline(line));
        }
    }

    lines.join("\n")
}

fn heading_text(line: &str) -> Option<&str> {
    let rest = line.trim_start_matches('#');
    let level = line.len() - rest.len();
    (1..=6).contains(&level).then(|| rest.trim()).filter(|_| rest.starts_with(' '))
}

/// Handle **bold** and `inline code` within a single line.
fn render_inline(line: &str) -> String {
    let mut result = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                result.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                result.push_str(&after[..end].dimmed().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            result.push(c);
        }
        rest = chars.as_str();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain<T>(f: impl FnOnce() -> T) -> T {
        colored::control::set_override(false);
        f()
    }

    #[test]
    fn test_markdown_without_colors() {
        let text = "# Findings\nQubits are **fragile** and need `error correction`.\n```text\nraw\n```\ndone";
        let out = plain(|| render_markdown_lite(text));
        assert_eq!(
            out,
            "Findings\nQubits are fragile and need error correction.\n  text\n  raw\ndone"
        );
    }

    #[test]
    fn test_unclosed_markers_are_kept() {
        let out = plain(|| render_inline("2 ** 3 and a ` tick"));
        assert_eq!(out, "2 ** 3 and a ` tick");
    }

    #[test]
    fn test_tool_results_are_truncated() {
        let body: Vec<String> = (1..=12).map(|i| format!("line {i}")).collect();
        let out = plain(|| format_message(&Message::tool(body.join("\n"))));
        assert!(out.starts_with("tool result:\nline 1\n"));
        assert!(out.ends_with("line 8\n... (4 more lines)"));
    }
}
