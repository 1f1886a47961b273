//! OpenAI-compatible chat-completions provider.
//!
//! Works against any endpoint exposing `POST {base_url}/chat/completions`
//! with the OpenAI request and response shapes.

use super::{ChatProvider, ProviderError, ProviderResponse};
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct OpenAiChatProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<ProviderResponse, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending request to chat completions API"
        );

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if !self.config.api_key.is_empty() {
            builder = builder.bearer_auth(&self.config.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.config.timeout)
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        parse_completion(&body)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

/// Extract `choices[0].message.content` and usage from a response body.
pub fn parse_completion(body: &str) -> Result<ProviderResponse, ProviderError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or_else(|| {
            ProviderError::MalformedResponse("missing choices[0].message.content".to_string())
        })?;

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyReply);
    }

    let usage = parsed.usage.unwrap_or_default();

    Ok(ProviderResponse {
        text,
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
    })
}

// Chat completions API types

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<AssistantMessage>,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_parse_completion() {
        let body = r#"{
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello!"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        }"#;

        let response = parse_completion(body).unwrap();
        assert_eq!(response.text, "Hello!");
        assert_eq!(response.input_tokens, 12);
        assert_eq!(response.output_tokens, 3);
    }

    #[test]
    fn test_parse_completion_without_usage() {
        let body = r#"{"choices": [{"message": {"content": "Hi"}}]}"#;
        let response = parse_completion(body).unwrap();
        assert_eq!(response.text, "Hi");
        assert_eq!(response.input_tokens, 0);
    }

    #[test]
    fn test_parse_completion_missing_content() {
        for body in [
            r#"{"choices": []}"#,
            r#"{"choices": [{}]}"#,
            r#"{"choices": [{"message": {"role": "assistant"}}]}"#,
            r#"{"error": {"message": "quota"}}"#,
        ] {
            assert!(
                matches!(
                    parse_completion(body),
                    Err(ProviderError::MalformedResponse(_))
                ),
                "{body}"
            );
        }
    }

    #[test]
    fn test_parse_completion_rejects_garbage() {
        assert!(matches!(
            parse_completion("<html>bad gateway</html>"),
            Err(ProviderError::MalformedResponse(_))
        ));
        assert!(matches!(
            parse_completion(r#"{"choices": [{"message": {"content": "  "}}]}"#),
            Err(ProviderError::EmptyReply)
        ));
    }

    #[test]
    fn test_request_shape() {
        let messages = vec![
            ChatMessage::new(Role::System, "persona"),
            ChatMessage::new(Role::User, "hi"),
        ];
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: &messages,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn test_completions_url_trims_slash() {
        let provider = OpenAiChatProvider::new(OpenAiConfig {
            base_url: "http://localhost:9999/v1/".to_string(),
            api_key: String::new(),
            model: "m".to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        assert_eq!(
            provider.completions_url(),
            "http://localhost:9999/v1/chat/completions"
        );
    }
}
