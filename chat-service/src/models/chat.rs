//! Wire types for `POST /api/chat`.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Inbound chat message from the widget.
///
/// Missing fields deserialize to empty strings so they fail validation
/// (400) rather than JSON extraction.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,

    /// Display name the client already knows, if any.
    #[serde(default)]
    pub name: Option<String>,
}

impl ChatRequest {
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: user_id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Reply for the widget. `newName` is always present, `null` unless the
/// message declared a new name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub reply: String,
    pub new_name: Option<String>,
}

impl ChatReply {
    pub fn new(reply: impl Into<String>, new_name: Option<String>) -> Self {
        Self {
            reply: reply.into(),
            new_name,
        }
    }
}
