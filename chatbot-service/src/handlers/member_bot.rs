//! Member chat bots. Failures still answer with a bot reply so the chat
//! window has something to show.

use axum::extract::{rejection::JsonRejection, State};
use axum::Json;

use crate::dtos::{ApiResponse, MemberChatRequest, MixBotRequest};
use crate::error::{ApiError, ChatbotError};
use crate::models::{BotType, MemberMessage};
use crate::services::documents::RecursiveCharacterTextSplitter;
use crate::services::providers::{invoke_chat, ChatMessage, GenerationParams};
use crate::services::rag::{answer_with_context, RAG_TEMPERATURE};
use crate::services::vector_store::{add_documents, Retriever};
use crate::startup::AppState;

pub const PDF_BOT_PLACEHOLDER: &str = "developing........";

/// Route the message to OpenAI or Gemini depending on `botType`.
#[tracing::instrument(skip_all)]
pub async fn mix_bot(
    State(state): State<AppState>,
    body: Result<Json<MixBotRequest>, JsonRejection>,
) -> Result<ApiResponse<MemberMessage>, ApiError> {
    let Json(req) = body.map_err(ApiError::with_fallback)?;

    let provider = match BotType::parse(&req.bot_type) {
        Some(BotType::LlmGpt) => state.openai_chat.clone(),
        Some(BotType::LlmGemini) => state.gemini_chat.clone(),
        None => {
            return Err(ApiError::with_fallback(ChatbotError::UnsupportedBotType(
                req.bot_type,
            )))
        }
    };

    tracing::info!(
        provider = provider.name(),
        nick_name = req.nick_name.as_deref().unwrap_or_default(),
        "Mixbot request"
    );

    let reply = invoke_chat(
        provider.as_ref(),
        &[ChatMessage::user(req.message)],
        &GenerationParams::default(),
    )
    .await
    .map_err(ApiError::with_fallback)?;

    Ok(ApiResponse::ok(MemberMessage::bot(reply)))
}

/// Placeholder for the in-memory PDF bot.
#[tracing::instrument(skip_all)]
pub async fn pdf_bot(
    body: Result<Json<MemberChatRequest>, JsonRejection>,
) -> Result<ApiResponse<MemberMessage>, ApiError> {
    let Json(_req) = body.map_err(ApiError::with_fallback)?;
    Ok(ApiResponse::ok(MemberMessage::bot(PDF_BOT_PLACEHOLDER)))
}

/// Index the configured PDF into Pinecone, retrieve against the question and
/// answer with the RAG prompt.
#[tracing::instrument(skip_all)]
pub async fn pdf_pinecone_bot(
    State(state): State<AppState>,
    body: Result<Json<MemberChatRequest>, JsonRejection>,
) -> Result<ApiResponse<MemberMessage>, ApiError> {
    let Json(req) = body.map_err(ApiError::with_fallback)?;

    let reply = answer_from_pdf(&state, &req.message)
        .await
        .map_err(ApiError::with_fallback)?;

    Ok(ApiResponse::ok(MemberMessage::bot(reply)))
}

async fn answer_from_pdf(state: &AppState, question: &str) -> Result<String, ChatbotError> {
    let pages = state.pdf_loader.load().await?;
    let chunks = RecursiveCharacterTextSplitter::default().split_documents(&pages);

    tracing::info!(
        path = %state.pdf_loader.path().display(),
        pages = pages.len(),
        chunks = chunks.len(),
        "Indexing PDF"
    );

    add_documents(state.pdf_store.as_ref(), state.embeddings.as_ref(), chunks).await?;

    let docs = Retriever::new(state.pdf_store.clone(), state.embeddings.clone())
        .invoke(question)
        .await?;

    answer_with_context(
        state.openai_chat.as_ref(),
        question,
        &docs,
        &GenerationParams::with_temperature(RAG_TEMPERATURE),
    )
    .await
}
