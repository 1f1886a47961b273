//! Request sequencing for `POST /api/chat`.
//!
//! validate -> resolve session -> evaluate rules -> (short-circuit | build
//! prompt -> call upstream) -> record history -> reply.

use crate::config::{DEFAULT_DEGRADED_REPLY, DEFAULT_UPSTREAM_TIMEOUT_SECS};
use crate::error::ChatError;
use crate::models::{ChatMessage, ChatReply, ChatRequest, Role};
use crate::services::metrics::{self, outcome};
use crate::services::prompt::PromptBuilder;
use crate::services::providers::{ChatProvider, ProviderError, ProviderResponse};
use crate::services::rules::{RuleEngine, RuleOutcome, CREATOR_DENIAL};
use crate::services::store::ConversationStore;
use std::sync::Arc;
use std::time::{Duration, Instant};
use validator::Validate;

pub struct ChatOrchestrator {
    store: Arc<dyn ConversationStore>,
    provider: Arc<dyn ChatProvider>,
    rules: RuleEngine,
    prompt: PromptBuilder,
    upstream_timeout: Duration,
    degraded_reply: String,
}

impl ChatOrchestrator {
    pub fn new(store: Arc<dyn ConversationStore>, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            store,
            provider,
            rules: RuleEngine::default(),
            prompt: PromptBuilder::default(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            degraded_reply: DEFAULT_DEGRADED_REPLY.to_string(),
        }
    }

    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_prompt_builder(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn with_upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    pub fn with_degraded_reply(mut self, reply: impl Into<String>) -> Self {
        self.degraded_reply = reply.into();
        self
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Handle one chat message.
    ///
    /// Upstream failures never surface as errors: the caller gets the
    /// degraded reply and the user's turn stays in history.
    #[tracing::instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatReply, ChatError> {
        if let Err(e) = request.validate() {
            metrics::record_chat_request(outcome::INVALID);
            return Err(e.into());
        }

        let ChatRequest {
            message,
            user_id,
            name,
        } = request;
        let name = name.filter(|n| !n.is_empty());

        let mut profile = self.store.get_or_create(&user_id, name.as_deref()).await?;
        if let (Some(name), None) = (&name, &profile.saved_name) {
            self.store.set_saved_name(&user_id, name).await?;
            profile.saved_name = Some(name.clone());
        }

        let rule_outcome = self.rules.evaluate(&profile, &message);
        tracing::debug!(outcome = rule_outcome.label(), "Rules evaluated");

        let new_name = match rule_outcome {
            RuleOutcome::CreatorClaim => {
                self.store.append_turn(&user_id, Role::User, &message).await?;
                metrics::record_chat_request(outcome::CREATOR_CLAIM);
                tracing::info!("Creator claim rebuffed");
                return Ok(ChatReply::new(CREATOR_DENIAL, None));
            }
            RuleOutcome::NameDeclared(declared) => {
                self.store.set_saved_name(&user_id, &declared).await?;
                tracing::info!(name = %declared, "User declared a name");
                profile.saved_name = Some(declared.clone());
                Some(declared)
            }
            RuleOutcome::NoRule => None,
        };

        self.store.append_turn(&user_id, Role::User, &message).await?;

        let history = self
            .store
            .recent_history(&user_id, self.prompt.history_window())
            .await?;
        let prompt = self.prompt.build(&profile, &history);

        let reply = match self.call_upstream(&prompt).await {
            Ok(response) => {
                self.store
                    .append_turn(&user_id, Role::Assistant, &response.text)
                    .await?;
                metrics::record_chat_request(if new_name.is_some() {
                    outcome::NAME_DECLARED
                } else {
                    outcome::MODEL
                });
                response.text
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = e.kind(),
                    "Upstream call failed, replying with degraded message"
                );
                metrics::record_upstream_failure(e.kind());
                metrics::record_chat_request(outcome::DEGRADED);
                self.degraded_reply.clone()
            }
        };

        Ok(ChatReply::new(reply, new_name))
    }

    /// Single upstream attempt bounded by `upstream_timeout`.
    async fn call_upstream(
        &self,
        prompt: &[ChatMessage],
    ) -> Result<ProviderResponse, ProviderError> {
        let started = Instant::now();

        let response = tokio::time::timeout(self.upstream_timeout, self.provider.complete(prompt))
            .await
            .map_err(|_| ProviderError::Timeout(self.upstream_timeout))??;

        metrics::record_upstream_call(
            self.provider.model(),
            started.elapsed(),
            response.input_tokens,
            response.output_tokens,
        );

        Ok(response)
    }
}
