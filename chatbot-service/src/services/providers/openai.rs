//! OpenAI provider implementation.
//!
//! Chat completions and embeddings over the OpenAI REST API.

use super::{
    error_from_response, http_client, ChatMessage, ChatProvider, EmbeddingProvider,
    GenerationParams, ProviderError,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI API base URL.
pub const OPENAI_API_BASE: &str = "https://api.openai.com";

/// Largest number of inputs sent in one embeddings request.
const EMBEDDING_BATCH_SIZE: usize = 512;

/// OpenAI provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

fn check_configured(config: &OpenAiConfig) -> Result<(), ProviderError> {
    if config.api_key.is_empty() {
        Err(ProviderError::NotConfigured(
            "OpenAI API key not configured".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// OpenAI chat completion provider.
pub struct OpenAiChatProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: http_client(),
        }
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        check_configured(&self.config)?;

        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending request to OpenAI chat completions"
        );

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response("OpenAI", response).await);
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or(ProviderError::EmptyResponse)?;

        if choice.finish_reason.as_deref() == Some("content_filter") {
            return Err(ProviderError::ContentFiltered);
        }

        choice.message.content.ok_or(ProviderError::EmptyResponse)
    }
}

/// OpenAI embeddings provider.
pub struct OpenAiEmbeddingProvider {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiEmbeddingProvider {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            client: http_client(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/v1/embeddings", self.config.base_url.trim_end_matches('/'))
    }

    async fn embed_batch(&self, batch: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        let request = EmbeddingRequest {
            model: &self.config.model,
            input: batch,
        };

        let response = self
            .client
            .post(self.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response("OpenAI", response).await);
        }

        let mut api_response: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        if api_response.data.len() != batch.len() {
            return Err(ProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                batch.len(),
                api_response.data.len()
            )));
        }

        api_response.data.sort_by_key(|d| d.index);
        Ok(api_response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        check_configured(&self.config)?;

        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            embeddings.extend(self.embed_batch(batch).await?);
        }

        tracing::debug!(
            model = %self.config.model,
            count = embeddings.len(),
            "Generated OpenAI embeddings"
        );

        Ok(embeddings)
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str) -> OpenAiConfig {
        OpenAiConfig {
            api_key: api_key.to_string(),
            base_url: "http://localhost:1/".to_string(),
            model: "gpt-4o".to_string(),
        }
    }

    #[test]
    fn api_url_strips_trailing_slash() {
        let provider = OpenAiChatProvider::new(config("k"));
        assert_eq!(provider.api_url(), "http://localhost:1/v1/chat/completions");
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let provider = OpenAiChatProvider::new(config(""));
        let err = provider
            .chat(&[ChatMessage::user("hi")], &GenerationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn request_omits_unset_params() {
        let messages = [ChatMessage::user("hi")];
        let request = ChatCompletionRequest {
            model: "gpt-4o",
            messages: &messages,
            temperature: None,
            max_tokens: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
