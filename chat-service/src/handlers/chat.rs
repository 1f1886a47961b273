use axum::{extract::State, Extension, Json};
use service_core::middleware::RequestId;

use crate::error::ChatError;
use crate::models::{ChatReply, ChatRequest};
use crate::startup::AppState;
use crate::utils::ValidatedJson;

/// `POST /api/chat`: `{message, userId, name?}` -> `{reply, newName}`.
#[tracing::instrument(
    skip(state, request_id, request),
    fields(request_id = request_id.as_ref().map(|e| e.0.as_str()).unwrap_or("-"))
)]
pub async fn chat(
    State(state): State<AppState>,
    request_id: Option<Extension<RequestId>>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatReply>, ChatError> {
    let reply = state.orchestrator.handle(request).await?;
    Ok(Json(reply))
}
