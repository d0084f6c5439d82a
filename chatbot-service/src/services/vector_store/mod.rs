//! Vector stores and the retriever used by the RAG handlers.

pub mod memory;
pub mod pinecone;

pub use memory::MemoryVectorStore;
pub use pinecone::{PineconeConfig, PineconeStore};

use crate::services::documents::Document;
use crate::services::providers::{EmbeddingProvider, ProviderError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Number of documents a retriever returns unless told otherwise.
pub const DEFAULT_TOP_K: usize = 4;

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Embedding failed: {0}")]
    Embedding(#[from] ProviderError),

    #[error("Vector store not configured: {0}")]
    NotConfigured(String),

    #[error("Vector store API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Got {vectors} vectors for {documents} documents")]
    LengthMismatch { vectors: usize, documents: usize },
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    fn name(&self) -> &'static str;

    /// Store pre-computed vectors alongside their documents.
    async fn add_vectors(
        &self,
        vectors: Vec<Vec<f32>>,
        documents: Vec<Document>,
    ) -> Result<(), VectorStoreError>;

    /// Up to `k` documents closest to `query`, best first, with their scores.
    async fn similarity_search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>, VectorStoreError>;
}

/// Embed `documents` and add them to `store`.
pub async fn add_documents(
    store: &dyn VectorStore,
    embeddings: &dyn EmbeddingProvider,
    documents: Vec<Document>,
) -> Result<(), VectorStoreError> {
    if documents.is_empty() {
        return Ok(());
    }

    let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
    let vectors = embeddings.embed_documents(&texts).await?;

    if vectors.len() != documents.len() {
        return Err(VectorStoreError::LengthMismatch {
            vectors: vectors.len(),
            documents: documents.len(),
        });
    }

    tracing::debug!(
        store = store.name(),
        embedder = embeddings.name(),
        count = documents.len(),
        "Adding documents to vector store"
    );

    store.add_vectors(vectors, documents).await
}

/// Embeds a query and returns the closest stored documents.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn VectorStore>,
    embeddings: Arc<dyn EmbeddingProvider>,
    k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            store,
            embeddings,
            k: DEFAULT_TOP_K,
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub async fn invoke(&self, query: &str) -> Result<Vec<Document>, VectorStoreError> {
        let vector = self.embeddings.embed_query(query).await?;
        let results = self
            .store
            .similarity_search_by_vector(&vector, self.k)
            .await?;

        crate::services::metrics::record_retrieval(self.store.name(), results.len());
        tracing::debug!(
            store = self.store.name(),
            k = self.k,
            found = results.len(),
            top_score = results.first().map(|(_, s)| *s),
            "Vector store query results"
        );

        Ok(results.into_iter().map(|(doc, _)| doc).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockEmbeddingProvider;

    #[tokio::test]
    async fn retriever_returns_most_similar_documents_first() {
        let store = Arc::new(MemoryVectorStore::new());
        let embeddings = Arc::new(MockEmbeddingProvider::new());

        add_documents(
            store.as_ref(),
            embeddings.as_ref(),
            vec![
                Document::new("reset the router by holding the power button"),
                Document::new("the warranty covers two years"),
                Document::new("cleaning instructions for the case"),
            ],
        )
        .await
        .unwrap();

        let retriever = Retriever::new(store, embeddings).with_k(2);
        let docs = retriever.invoke("how do I reset the router").await.unwrap();

        assert_eq!(docs.len(), 2);
        assert!(docs[0].page_content.starts_with("reset the router"));
    }

    #[tokio::test]
    async fn embedding_failures_surface_as_store_errors() {
        let store = MemoryVectorStore::new();
        let err = add_documents(
            &store,
            &MockEmbeddingProvider::failing(),
            vec![Document::new("text")],
        )
        .await
        .unwrap_err();

        assert!(matches!(err, VectorStoreError::Embedding(_)));
    }

    #[tokio::test]
    async fn adding_nothing_is_a_no_op() {
        let store = MemoryVectorStore::new();
        add_documents(&store, &MockEmbeddingProvider::failing(), Vec::new())
            .await
            .unwrap();
        assert_eq!(store.len().await, 0);
    }
}
