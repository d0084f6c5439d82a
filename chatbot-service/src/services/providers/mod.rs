//! LLM provider abstractions and implementations.
//!
//! Chat and embedding backends sit behind traits so handlers can be wired to
//! OpenAI, Gemini, or the in-process mocks used in tests.

pub mod gemini;
pub mod mock;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Provider returned no content")]
    EmptyResponse,
}

impl ProviderError {
    /// Short label used for the provider error metric.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::ContentFiltered => "content_filtered",
            ProviderError::NetworkError(_) => "network",
            ProviderError::EmptyResponse => "empty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

impl ChatRole {
    /// Parse the role names used in prompt templates.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "system" => Some(ChatRole::System),
            "user" | "human" => Some(ChatRole::User),
            "assistant" | "ai" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Generation parameters for chat requests.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    /// Temperature (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum output tokens.
    pub max_tokens: Option<i32>,
}

impl GenerationParams {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature: Some(temperature),
            ..Self::default()
        }
    }
}

/// Chat completion backend. Returns only the text of the reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider label for logs and metrics.
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, ProviderError>;
}

/// Text embedding backend.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embed_documents(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Send `messages` to `provider`, recording latency and failures.
pub async fn invoke_chat(
    provider: &dyn ChatProvider,
    messages: &[ChatMessage],
    params: &GenerationParams,
) -> Result<String, ProviderError> {
    let start = std::time::Instant::now();
    let result = provider.chat(messages, params).await;

    crate::services::metrics::record_provider_latency(
        provider.name(),
        provider.model(),
        start.elapsed().as_secs_f64(),
    );

    match &result {
        Ok(text) => tracing::debug!(
            provider = provider.name(),
            model = provider.model(),
            reply_len = text.len(),
            "Chat completion succeeded"
        ),
        Err(e) => {
            crate::services::metrics::record_provider_error(provider.name(), e.kind());
            tracing::warn!(
                provider = provider.name(),
                model = provider.model(),
                error = %e,
                "Chat completion failed"
            );
        }
    }

    result
}

/// Build the HTTP client shared by the hosted providers.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(120))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map a non-success HTTP response to a provider error.
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    if status.as_u16() == 429 {
        return ProviderError::RateLimited;
    }
    let error_text = response.text().await.unwrap_or_default();
    ProviderError::ApiError(format!("{} API error {}: {}", provider, status, error_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_accepts_template_aliases() {
        assert_eq!(ChatRole::parse("human"), Some(ChatRole::User));
        assert_eq!(ChatRole::parse("ai"), Some(ChatRole::Assistant));
        assert_eq!(ChatRole::parse("system"), Some(ChatRole::System));
        assert_eq!(ChatRole::parse("tool"), None);
    }

    #[test]
    fn chat_message_serializes_lowercase_role() {
        let value = serde_json::to_value(ChatMessage::system("be brief")).unwrap();
        assert_eq!(value["role"], "system");
        assert_eq!(value["content"], "be brief");
    }

    #[tokio::test]
    async fn invoke_chat_passes_through_reply() {
        let provider = mock::MockChatProvider::new();
        let reply = invoke_chat(
            &provider,
            &[ChatMessage::user("hi")],
            &GenerationParams::default(),
        )
        .await
        .unwrap();
        assert_eq!(reply, "Mock response for: hi");
    }

    #[tokio::test]
    async fn invoke_chat_surfaces_errors() {
        let provider = mock::MockChatProvider::failing();
        let err = invoke_chat(
            &provider,
            &[ChatMessage::user("hi")],
            &GenerationParams::default(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }
}
