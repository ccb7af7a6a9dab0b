//! Role-tagged chat history.
//!
//! The history is append-only and replayed in full as context on every model
//! call. It is scoped to one guest session, so no pruning is applied.

use serde::{Deserialize, Serialize};

use crate::types::ChatRole;

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ConversationMessage {
    #[must_use]
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Ordered conversation between the guest and the waiter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<ConversationMessage>,
    /// Number of leading messages that are context only (the priming prompt).
    #[serde(default)]
    hidden: usize,
}

impl Conversation {
    /// Create an empty conversation.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            hidden: 0,
        }
    }

    /// Start a conversation with a priming message and the waiter's greeting.
    ///
    /// The priming message is sent as a user turn so models without a system
    /// role still receive it; it is hidden from [`Conversation::visible`].
    #[must_use]
    pub fn seeded(priming: impl Into<String>, greeting: impl Into<String>) -> Self {
        Self {
            messages: vec![
                ConversationMessage::new(ChatRole::User, priming),
                ConversationMessage::new(ChatRole::Assistant, greeting),
            ],
            hidden: 1,
        }
    }

    /// Append a message to the end of the history.
    pub fn append(&mut self, role: ChatRole, content: impl Into<String>) {
        self.messages.push(ConversationMessage::new(role, content));
    }

    /// Full history in append order, including the priming message.
    #[must_use]
    pub fn history(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Messages shown to the guest.
    #[must_use]
    pub fn visible(&self) -> &[ConversationMessage] {
        self.messages.get(self.hidden..).unwrap_or_default()
    }

    /// The most recent message.
    #[must_use]
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_conversation_grows_in_append_order() {
        let mut convo = Conversation::seeded("You are a waiter.", "Welcome!");
        assert_eq!(convo.len(), 2);

        convo.append(ChatRole::User, "Two burgers please");
        convo.append(ChatRole::Assistant, "Coming right up");

        let history = convo.history();
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].content, "You are a waiter.");
        assert_eq!(history[1].role, ChatRole::Assistant);
        assert_eq!(history[2].content, "Two burgers please");
        assert_eq!(history[3].content, "Coming right up");
    }

    #[test]
    fn test_visible_hides_priming_message() {
        let convo = Conversation::seeded("secret instructions", "Hi there!");
        let visible = convo.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].content, "Hi there!");
    }

    #[test]
    fn test_unseeded_conversation_shows_everything() {
        let mut convo = Conversation::new();
        assert!(convo.is_empty());
        convo.append(ChatRole::User, "hello");
        assert_eq!(convo.visible().len(), 1);
        assert_eq!(convo.last().unwrap().role, ChatRole::User);
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut convo = Conversation::seeded("p", "g");
        convo.append(ChatRole::User, "u");
        let json = serde_json::to_string(&convo).unwrap();
        let parsed: Conversation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, convo);
        assert_eq!(parsed.visible().len(), 2);
    }
}
