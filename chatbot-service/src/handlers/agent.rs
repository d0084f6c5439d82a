use axum::extract::{rejection::JsonRejection, State};
use axum::Json;
use std::sync::Arc;

use crate::dtos::{ApiResponse, MemberChatRequest};
use crate::error::{ApiError, ChatbotError};
use crate::models::MemberMessage;
use crate::services::documents::RecursiveCharacterTextSplitter;
use crate::services::vector_store::{add_documents, MemoryVectorStore, Retriever, VectorStore};
use crate::startup::AppState;

/// Answer with the chunk of the configured web page closest to the question.
#[tracing::instrument(skip_all)]
pub async fn page_bot(
    State(state): State<AppState>,
    body: Result<Json<MemberChatRequest>, JsonRejection>,
) -> Result<ApiResponse<MemberMessage>, ApiError> {
    let Json(req) = body?;

    let pages = state.page_loader.load().await?;
    let chunks = RecursiveCharacterTextSplitter::default().split_documents(&pages);

    let store: Arc<dyn VectorStore> = Arc::new(MemoryVectorStore::new());
    add_documents(store.as_ref(), state.embeddings.as_ref(), chunks).await?;

    let top = Retriever::new(store, state.embeddings.clone())
        .invoke(&req.message)
        .await?
        .into_iter()
        .next()
        .ok_or(ChatbotError::NoDocumentsFound)?;

    Ok(ApiResponse::ok(MemberMessage::bot(top.page_content)))
}
