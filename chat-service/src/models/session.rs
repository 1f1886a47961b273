//! Per-user conversation state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-tagged message as sent to the upstream model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// One stored history entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

impl From<&ChatTurn> for ChatMessage {
    fn from(turn: &ChatTurn) -> Self {
        ChatMessage::new(turn.role, turn.content.clone())
    }
}

/// Conversation memory for a single `userId`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_name: Option<String>,

    /// Append-only, oldest first.
    pub history: Vec<ChatTurn>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(user_id: impl Into<String>, saved_name: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            saved_name,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push_turn(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(ChatTurn::new(role, content));
        self.updated_at = Utc::now();
    }

    pub fn set_saved_name(&mut self, name: impl Into<String>) {
        self.saved_name = Some(name.into());
        self.updated_at = Utc::now();
    }

    /// The last `n` history entries, oldest first.
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn profile(&self) -> SessionProfile {
        SessionProfile {
            user_id: self.user_id.clone(),
            saved_name: self.saved_name.clone(),
        }
    }
}

/// Identity half of a [`UserSession`], without history.
///
/// This is what the request path works with; history is only read through
/// `ConversationStore::recent_history`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProfile {
    pub user_id: String,
    pub saved_name: Option<String>,
}

impl SessionProfile {
    pub fn new(user_id: impl Into<String>, saved_name: Option<String>) -> Self {
        Self {
            user_id: user_id.into(),
            saved_name,
        }
    }
}
