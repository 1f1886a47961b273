use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ChatError;
use crate::services::metrics::{self, outcome};

/// JSON body extractor that rejects unparseable or invalid payloads with
/// [`ChatError::InvalidRequest`] (400) instead of axum's default 415/422.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = ChatError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            metrics::record_chat_request(outcome::INVALID);
            ChatError::InvalidRequest(format!("Json parse error: {}", e.body_text()))
        })?;

        value.validate().map_err(|e| {
            metrics::record_chat_request(outcome::INVALID);
            ChatError::from(e)
        })?;

        Ok(ValidatedJson(value))
    }
}
