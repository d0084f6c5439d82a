//! Stateless single-turn bots answered by the OpenAI chat model.

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use std::collections::HashMap;

use crate::dtos::{ApiResponse, ChatRequest, TranslateRequest};
use crate::error::ApiError;
use crate::models::Message;
use crate::services::prompts::simple_bot_prompt;
use crate::services::providers::{invoke_chat, ChatMessage, GenerationParams};
use crate::startup::AppState;

#[tracing::instrument(skip_all)]
pub async fn simple_bot(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<ApiResponse<Message>, ApiError> {
    let Json(req) = body?;

    let vars = HashMap::from([("input", req.message)]);
    let messages = simple_bot_prompt()?.format(&vars)?;
    let reply = invoke_chat(
        state.openai_chat.as_ref(),
        &messages,
        &GenerationParams::default(),
    )
    .await?;

    Ok(ApiResponse::ok(Message::bot(reply)))
}

/// The caller's `role` becomes the system instruction.
#[tracing::instrument(skip_all)]
pub async fn translate_bot(
    State(state): State<AppState>,
    body: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<ApiResponse<Message>, ApiError> {
    let Json(req) = body?;

    let messages = [ChatMessage::system(req.role), ChatMessage::user(req.message)];
    let reply = invoke_chat(
        state.openai_chat.as_ref(),
        &messages,
        &GenerationParams::default(),
    )
    .await?;

    Ok(ApiResponse::ok(Message::bot(reply)))
}
