//! Conversation State
//!
//! Information Hiding:
//! - The turn vector is private; callers only append through checked methods
//! - The system turn at index 0 is never exposed by `visible()`
//! - Turn indices are stable for the lifetime of a transcript (until `reset`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in the conversation, tagged by speaker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered transcript, always seeded with exactly one system turn.
#[derive(Debug, Clone)]
pub struct ConversationState {
    system_prompt: String,
    turns: Vec<Turn>,
}

impl ConversationState {
    /// Transcript holding only the system turn.
    pub fn initialize(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            turns: vec![Turn::system(system_prompt.clone())],
            system_prompt,
        }
    }

    /// Appends a user turn. Blank input is ignored and yields `None`.
    pub fn append_user(&mut self, text: &str) -> Option<usize> {
        if text.trim().is_empty() {
            tracing::debug!("[Conversation] Ignoring blank user input");
            return None;
        }
        self.turns.push(Turn::user(text));
        Some(self.turns.len() - 1)
    }

    /// Appends a model reply and returns its index.
    pub fn append_assistant(&mut self, text: impl Into<String>) -> usize {
        self.turns.push(Turn::assistant(text));
        self.turns.len() - 1
    }

    pub fn reset(&mut self) {
        tracing::debug!(
            "[Conversation] Resetting transcript ({} turns dropped)",
            self.turns.len() - 1
        );
        self.turns.truncate(1);
    }

    /// Full transcript including the system turn, as sent to the model.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// User and assistant turns with their stable indices.
    pub fn visible(&self) -> impl Iterator<Item = (usize, &Turn)> {
        self.turns
            .iter()
            .enumerate()
            .filter(|(_, turn)| turn.role != Role::System)
    }

    pub fn get(&self, index: usize) -> Option<&Turn> {
        self.turns.get(index)
    }

    /// Text of the most recent user turn.
    pub fn last_user(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User)
            .map(|turn| turn.content.as_str())
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Never true: the system turn is always present.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_has_single_system_turn() {
        let state = ConversationState::initialize("prompt");
        assert_eq!(state.len(), 1);
        assert_eq!(state.turns()[0].role, Role::System);
        assert_eq!(state.turns()[0].content, "prompt");
        assert_eq!(state.visible().count(), 0);
    }

    #[test]
    fn test_blank_user_input_is_ignored() {
        let mut state = ConversationState::initialize("prompt");
        for blank in ["", "   ", "\n\t", "\u{3000}"] {
            assert_eq!(state.append_user(blank), None);
        }
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn test_indices_are_stable() {
        let mut state = ConversationState::initialize("prompt");
        assert_eq!(state.append_user("우리 강아지가 구토를 해요"), Some(1));
        assert_eq!(state.append_user("아직 답이 없네요"), Some(2));
        assert_eq!(state.append_assistant("병원에 가보세요"), 3);

        let visible: Vec<usize> = state.visible().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![1, 2, 3]);
        assert_eq!(state.last_user(), Some("아직 답이 없네요"));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut state = ConversationState::initialize("prompt");
        state.append_user("hello");
        state.append_assistant("hi");
        state.reset();

        assert_eq!(state.len(), 1);
        assert_eq!(state.turns()[0], Turn::system("prompt"));
        assert_eq!(state.last_user(), None);
    }

    #[test]
    fn test_turn_serializes_as_chat_message() {
        let json = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
