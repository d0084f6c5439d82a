//! Error normalization for the API routes.
//!
//! Every failure inside a handler becomes `ChatbotError`; the handler wraps it
//! in [`ApiError`], which renders the 500 envelope.

use crate::dtos::ApiResponse;
use crate::models::MemberMessage;
use crate::services::documents::DocumentError;
use crate::services::prompts::PromptError;
use crate::services::providers::ProviderError;
use crate::services::vector_store::VectorStoreError;
use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatbotError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported bot type: {0}")]
    UnsupportedBotType(String),

    #[error("No documents matched the query")]
    NoDocumentsFound,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    VectorStore(#[from] VectorStoreError),
}

impl From<JsonRejection> for ChatbotError {
    fn from(rejection: JsonRejection) -> Self {
        ChatbotError::InvalidRequest(rejection.body_text())
    }
}

/// A handler failure plus the bot reply to send in its place, if any.
#[derive(Debug)]
pub struct ApiError {
    pub source: ChatbotError,
    pub fallback: Option<MemberMessage>,
}

impl ApiError {
    /// Attach the "not found" bot reply used by the member chat routes.
    pub fn with_fallback(source: impl Into<ChatbotError>) -> Self {
        Self {
            source: source.into(),
            fallback: Some(MemberMessage::not_found()),
        }
    }
}

impl From<ChatbotError> for ApiError {
    fn from(source: ChatbotError) -> Self {
        Self {
            source,
            fallback: None,
        }
    }
}

macro_rules! api_error_from {
    ($($err:ty),* $(,)?) => {
        $(
            impl From<$err> for ApiError {
                fn from(err: $err) -> Self {
                    ChatbotError::from(err).into()
                }
            }
        )*
    };
}

api_error_from!(
    JsonRejection,
    ProviderError,
    PromptError,
    DocumentError,
    VectorStoreError
);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.source, "Request failed");
        ApiResponse::server_error(self.fallback).into_response()
    }
}
