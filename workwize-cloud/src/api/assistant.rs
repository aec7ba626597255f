//! Chat endpoint

use axum::extract::State;
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::AppError;
use validator::Validate;

use crate::assistant::{self, ChatReply};
use crate::state::AppState;

use super::ApiResult;
use super::extract::ValidJson;

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ChatRequest {
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
}

/// POST /api/ai/chat
pub async fn chat(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ChatRequest>,
) -> ApiResult<ChatReply> {
    let message = req.message.trim();
    if message.is_empty() {
        return Err(AppError::validation("message must not be blank")
            .with_detail("fields", vec!["message"])
            .into());
    }
    let reply = assistant::chat(
        &state.pool,
        state.llm.as_ref(),
        message,
        state.config.assistant_sample_limit,
    )
    .await?;
    Ok(ApiResponse::success(reply))
}
