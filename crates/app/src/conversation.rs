//! Ordered transcript for a conversational surface.

use shared::agent_api::ChatMessage;

/// Append-only message log; the only other mutation is a full reset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    /// Bumped on every reset so in-flight replies can tell they are stale
    epoch: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.epoch += 1;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_keeps_order() {
        let mut conv = Conversation::new();
        conv.append(ChatMessage::user("a"));
        conv.append(ChatMessage::model("b"));
        conv.append(ChatMessage::user("c"));

        let texts: Vec<&str> = conv.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
        assert_eq!(conv.last().map(|m| m.text.as_str()), Some("c"));
    }

    #[test]
    fn test_reset_clears_and_advances_epoch() {
        let mut conv = Conversation::new();
        conv.append(ChatMessage::user("a"));
        let before = conv.epoch();

        conv.reset();
        assert!(conv.is_empty());
        assert_eq!(conv.epoch(), before + 1);
    }
}
