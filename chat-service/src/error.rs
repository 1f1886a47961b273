//! Errors surfaced by the chat endpoint.
//!
//! Every error body carries a `reply` string the widget can show as-is.

use crate::services::metrics::{self, outcome};
use crate::services::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

pub const INVALID_REQUEST_REPLY: &str = "Please send a message.";
pub const INTERNAL_ERROR_REPLY: &str = "Something went wrong on our side. Please try again.";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or empty `message`/`userId`, or an unparseable body.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ChatError {
    fn from(err: StoreError) -> Self {
        ChatError::Internal(anyhow::Error::new(err))
    }
}

impl From<validator::ValidationErrors> for ChatError {
    fn from(err: validator::ValidationErrors) -> Self {
        ChatError::InvalidRequest(err.to_string())
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub reply: String,
    pub error: String,
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ChatError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            ChatError::InvalidRequest(detail) => ErrorBody {
                reply: INVALID_REQUEST_REPLY.to_string(),
                error: detail.clone(),
            },
            ChatError::Internal(err) => {
                tracing::error!(error = ?err, "Chat request failed");
                metrics::record_chat_request(outcome::ERROR);
                ErrorBody {
                    reply: INTERNAL_ERROR_REPLY.to_string(),
                    error: "internal_error".to_string(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: same body as [`ChatError::Internal`].
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    ChatError::Internal(anyhow::anyhow!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ChatError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ChatError::from(StoreError::SessionNotFound("u".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_panic_response_is_generic_500() {
        let response = panic_response(Box::new("secret token abc123"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["reply"], INTERNAL_ERROR_REPLY);
        assert_eq!(body["error"], "internal_error");
        assert!(!body.to_string().contains("abc123"));
    }

    #[tokio::test]
    async fn test_invalid_request_body_keeps_detail() {
        let response = ChatError::InvalidRequest("userId is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["reply"], INVALID_REQUEST_REPLY);
        assert_eq!(body["error"], "userId is required");
    }
}
