//! Append-only conversation state owned by one agent session.

use crate::message::{Message, Role};

/// Ordered sequence of role-tagged messages.
///
/// The conversation is the only memory a session has. It grows monotonically:
/// [`Conversation::push`] is the single mutation, so earlier context is never
/// rewritten behind the model's back.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// Creates a conversation seeded with one system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)]
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Messages worth showing to a person: everything except system prompts.
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    /// Number of tool results recorded so far.
    pub fn tool_result_count(&self) -> usize {
        self.messages.iter().filter(|m| m.role == Role::Tool).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_seeded_with_system_message() {
        let conversation = Conversation::new("be helpful");
        assert_eq!(conversation.len(), 1);
        assert_eq!(conversation.messages()[0], Message::system("be helpful"));
        assert_eq!(conversation.visible().count(), 0);
    }

    #[test]
    fn test_push_preserves_order() {
        let mut conversation = Conversation::new("sys");
        conversation.push(Message::user("q"));
        conversation.push(Message::tool("t"));
        conversation.push(Message::assistant("a"));

        let roles: Vec<Role> = conversation.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Tool, Role::Assistant]
        );
        assert_eq!(conversation.tool_result_count(), 1);
        assert_eq!(conversation.last().map(Message::text), Some("a"));
    }
}
