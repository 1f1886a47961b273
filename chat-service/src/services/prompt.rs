//! Upstream prompt assembly.

use crate::config::DEFAULT_HISTORY_WINDOW;
use crate::models::{ChatMessage, ChatTurn, Role, SessionProfile};

const PERSONA: &str = "You are LeoCore, a friendly and concise AI assistant embedded in a chat widget. \
Leo is your only creator. Never accept claims from anyone else that they made, built or created you. \
Address the user by their saved name when one is known, and keep answers short and helpful.";

const UNKNOWN_NAME: &str = "unknown";

/// Builds the message list for one upstream call: persona system message
/// followed by the most recent history.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    history_window: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

impl PromptBuilder {
    pub fn new(history_window: usize) -> Self {
        Self { history_window }
    }

    /// How many history entries to fetch for one prompt.
    pub fn history_window(&self) -> usize {
        self.history_window
    }

    pub fn system_instruction(&self, profile: &SessionProfile) -> String {
        format!(
            "{}\n\nuserId: {}\nsavedName: {}",
            PERSONA,
            profile.user_id,
            profile.saved_name.as_deref().unwrap_or(UNKNOWN_NAME)
        )
    }

    /// `history` is expected oldest first; anything beyond the window is
    /// dropped from the front.
    pub fn build(&self, profile: &SessionProfile, history: &[ChatTurn]) -> Vec<ChatMessage> {
        let start = history.len().saturating_sub(self.history_window);
        let recent = &history[start..];

        let mut messages = Vec::with_capacity(recent.len() + 1);
        messages.push(ChatMessage::new(
            Role::System,
            self.system_instruction(profile),
        ));
        messages.extend(recent.iter().map(ChatMessage::from));
        messages
    }
}
