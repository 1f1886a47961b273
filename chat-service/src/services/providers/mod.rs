//! Upstream model provider abstractions and implementations.
//!
//! The orchestrator only sees [`ChatProvider`], so the OpenAI-compatible
//! client and the mock are interchangeable.

pub mod mock;
pub mod openai;

pub use mock::MockChatProvider;
pub use openai::{OpenAiChatProvider, OpenAiConfig};

use crate::models::ChatMessage;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Empty reply")]
    EmptyReply,

    #[error("Timed out after {0:?}")]
    Timeout(Duration),
}

impl ProviderError {
    /// Stable label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::NetworkError(_) => "network",
            ProviderError::ApiError { .. } => "api_status",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::MalformedResponse(_) => "malformed",
            ProviderError::EmptyReply => "empty",
            ProviderError::Timeout(_) => "timeout",
        }
    }
}

/// Result of a completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderResponse {
    /// Generated reply text.
    pub text: String,

    /// Prompt tokens consumed, when reported.
    pub input_tokens: u32,

    /// Completion tokens generated, when reported.
    pub output_tokens: u32,
}

/// A chat-completion backend. One request per call; no retries.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, ProviderError>;

    /// Model identifier sent upstream.
    fn model(&self) -> &str;
}
