//! Conversation memory.
//!
//! [`ConversationStore`] is the only owner of [`UserSession`]s. The request
//! path sees a [`SessionProfile`] plus a bounded history window and mutates
//! through the trait. The in-memory backend keeps every session for the life
//! of the process.

use crate::models::{ChatTurn, Role, SessionProfile, UserSession};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Keyed store of per-user conversation state.
///
/// Calls for different users are independent. Concurrent calls for the same
/// user are not serialized beyond each individual operation, so two
/// in-flight requests may interleave their appends.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Return the profile for `user_id`, creating the session with `name`
    /// if absent.
    async fn get_or_create(
        &self,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<SessionProfile, StoreError>;

    /// Append one history entry. The session must already exist.
    async fn append_turn(&self, user_id: &str, role: Role, content: &str)
    -> Result<(), StoreError>;

    /// The last `n` entries, oldest first.
    async fn recent_history(&self, user_id: &str, n: usize) -> Result<Vec<ChatTurn>, StoreError>;

    /// Overwrite the saved display name.
    async fn set_saved_name(&self, user_id: &str, name: &str) -> Result<(), StoreError>;

    /// Full snapshot lookup without creating. Not used on the request path.
    async fn session(&self, user_id: &str) -> Result<Option<UserSession>, StoreError>;
}

/// Process-local store. No eviction, no size cap.
#[derive(Clone, Default)]
pub struct InMemoryConversationStore {
    sessions: Arc<DashMap<String, UserSession>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn get_or_create(
        &self,
        user_id: &str,
        name: Option<&str>,
    ) -> Result<SessionProfile, StoreError> {
        match self.sessions.entry(user_id.to_string()) {
            Entry::Occupied(entry) => Ok(entry.get().profile()),
            Entry::Vacant(entry) => {
                tracing::debug!(user_id = %user_id, "Creating conversation session");
                let session = UserSession::new(user_id, name.map(str::to_string));
                Ok(entry.insert(session).profile())
            }
        }
    }

    async fn append_turn(
        &self,
        user_id: &str,
        role: Role,
        content: &str,
    ) -> Result<(), StoreError> {
        let mut session = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| StoreError::SessionNotFound(user_id.to_string()))?;
        session.push_turn(role, content);
        Ok(())
    }

    async fn recent_history(&self, user_id: &str, n: usize) -> Result<Vec<ChatTurn>, StoreError> {
        let session = self
            .sessions
            .get(user_id)
            .ok_or_else(|| StoreError::SessionNotFound(user_id.to_string()))?;
        Ok(session.recent(n).to_vec())
    }

    async fn set_saved_name(&self, user_id: &str, name: &str) -> Result<(), StoreError> {
        let mut session = self
            .sessions
            .get_mut(user_id)
            .ok_or_else(|| StoreError::SessionNotFound(user_id.to_string()))?;
        session.set_saved_name(name);
        Ok(())
    }

    async fn session(&self, user_id: &str) -> Result<Option<UserSession>, StoreError> {
        Ok(self.sessions.get(user_id).map(|s| s.value().clone()))
    }
}
