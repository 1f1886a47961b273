//! Mock provider for tests and for running without upstream credentials.

use super::{ChatProvider, ProviderError, ProviderResponse};
use crate::models::{ChatMessage, Role};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Debug, Clone)]
enum Behavior {
    Echo,
    Fixed(String),
    Fail,
    Hang(Duration),
}

/// In-process stand-in for the upstream model.
///
/// Records every prompt it receives so tests can assert on call counts and
/// prompt contents.
pub struct MockChatProvider {
    enabled: bool,
    behavior: Behavior,
    calls: AtomicUsize,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatProvider {
    /// Echoes the latest user message.
    pub fn new(enabled: bool) -> Self {
        Self::with_behavior(enabled, Behavior::Echo)
    }

    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self::with_behavior(true, Behavior::Fixed(reply.into()))
    }

    /// Every call fails with an upstream API error.
    pub fn failing() -> Self {
        Self::with_behavior(true, Behavior::Fail)
    }

    /// Every call sleeps for `delay` before echoing.
    pub fn hanging(delay: Duration) -> Self {
        Self::with_behavior(true, Behavior::Hang(delay))
    }

    fn with_behavior(enabled: bool, behavior: Behavior) -> Self {
        Self {
            enabled,
            behavior,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn last_prompt(&self) -> Option<Vec<ChatMessage>> {
        self.prompts.lock().await.last().cloned()
    }

    fn echo(messages: &[ChatMessage]) -> String {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        format!("Mock response for: {}", last_user)
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(messages.to_vec());

        let text = match &self.behavior {
            Behavior::Echo => Self::echo(messages),
            Behavior::Fixed(reply) => reply.clone(),
            Behavior::Fail => {
                return Err(ProviderError::ApiError {
                    status: 503,
                    body: "mock upstream unavailable".to_string(),
                });
            }
            Behavior::Hang(delay) => {
                tokio::time::sleep(*delay).await;
                Self::echo(messages)
            }
        };

        let input_tokens = messages.iter().map(|m| m.content.len() as u32 / 4).sum();

        Ok(ProviderResponse {
            output_tokens: text.len() as u32 / 4,
            text,
            input_tokens,
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}
