//! Mock provider implementations for testing.

use super::{ChatMessage, ChatProvider, EmbeddingProvider, GenerationParams, ProviderError};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Dimension of the vectors produced by [`MockEmbeddingProvider`].
pub const MOCK_EMBEDDING_DIMENSIONS: usize = 256;

/// Mock chat provider: replies with the last message it was sent.
pub struct MockChatProvider {
    enabled: bool,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A provider whose every call fails.
    pub fn failing() -> Self {
        Self { enabled: false }
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-chat"
    }

    async fn chat(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<String, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock chat provider not enabled".to_string(),
            ));
        }

        let last = messages.last().map(|m| m.content.as_str()).unwrap_or("");
        Ok(format!("Mock response for: {}", last))
    }
}

/// Mock embedding provider: hashed bag-of-words vectors, so texts sharing
/// words score higher under cosine similarity.
pub struct MockEmbeddingProvider {
    enabled: bool,
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn failing() -> Self {
        Self { enabled: false }
    }

    fn embed(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; MOCK_EMBEDDING_DIMENSIONS];
        for word in text.split_whitespace() {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let slot = (hasher.finish() % MOCK_EMBEDDING_DIMENSIONS as u64) as usize;
            vector[slot] += 1.0;
        }
        vector
    }
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if !self.enabled {
            return Err(ProviderError::NotConfigured(
                "Mock embedding provider not enabled".to_string(),
            ));
        }
        Ok(texts.iter().map(|t| Self::embed(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::new();
        let a = provider.embed_query("rust axum").await.unwrap();
        let b = provider.embed_query("rust axum").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), MOCK_EMBEDDING_DIMENSIONS);
    }

    #[tokio::test]
    async fn failing_embedder_errors() {
        let provider = MockEmbeddingProvider::failing();
        assert!(provider.embed_query("x").await.is_err());
    }
}
