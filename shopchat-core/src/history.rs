//! Per-session conversation history.

use serde::{Deserialize, Serialize};

/// One exchange: what the user asked and what the bot answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user: String,
    pub bot: String,
}

/// Append-only, chronologically ordered list of turns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    turns: Vec<ChatTurn>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Append a turn at the end.
    pub fn push(&mut self, user: impl Into<String>, bot: impl Into<String>) {
        self.turns.push(ChatTurn {
            user: user.into(),
            bot: bot.into(),
        });
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_order() {
        let mut history = ChatHistory::new();
        assert!(history.is_empty());
        history.push("first", "one");
        history.push("second", "two");
        assert_eq!(history.len(), 2);
        assert_eq!(history.turns()[0].user, "first");
        assert_eq!(history.last().unwrap().bot, "two");
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut history = ChatHistory::new();
        history.push("Hello", "Hi!");
        let json = serde_json::to_string(&history).unwrap();
        assert_eq!(json, r#"[{"user":"Hello","bot":"Hi!"}]"#);
        let restored: ChatHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, history);
    }
}
