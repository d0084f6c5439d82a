use super::{VectorStore, VectorStoreError};
use crate::services::documents::Document;
use async_trait::async_trait;
use tokio::sync::RwLock;

struct MemoryVector {
    document: Document,
    embedding: Vec<f32>,
}

/// In-process vector store ranked by cosine similarity.
#[derive(Default)]
pub struct MemoryVectorStore {
    vectors: RwLock<Vec<MemoryVector>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.vectors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.vectors.read().await.is_empty()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn add_vectors(
        &self,
        vectors: Vec<Vec<f32>>,
        documents: Vec<Document>,
    ) -> Result<(), VectorStoreError> {
        if vectors.len() != documents.len() {
            return Err(VectorStoreError::LengthMismatch {
                vectors: vectors.len(),
                documents: documents.len(),
            });
        }

        let mut guard = self.vectors.write().await;
        guard.extend(
            vectors
                .into_iter()
                .zip(documents)
                .map(|(embedding, document)| MemoryVector {
                    document,
                    embedding,
                }),
        );
        Ok(())
    }

    async fn similarity_search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>, VectorStoreError> {
        let guard = self.vectors.read().await;

        let mut scored: Vec<(usize, f32)> = guard
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(query, &v.embedding)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| (guard[i].document.clone(), score))
            .collect())
    }
}

/// Compute cosine similarity between two embeddings
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0, 0.0]);
        assert!((sim - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let sim = cosine_similarity(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!(sim.abs() < 0.0001);
    }

    #[test]
    fn test_cosine_similarity_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }

    #[tokio::test]
    async fn search_orders_by_score_and_truncates_to_k() {
        let store = MemoryVectorStore::new();
        store
            .add_vectors(
                vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.7, 0.7]],
                vec![Document::new("y"), Document::new("x"), Document::new("xy")],
            )
            .await
            .unwrap();

        let results = store.similarity_search_by_vector(&[1.0, 0.1], 2).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0.page_content, "x");
        assert_eq!(results[1].0.page_content, "xy");
        assert!(results[0].1 >= results[1].1);
    }

    #[tokio::test]
    async fn mismatched_input_is_rejected() {
        let store = MemoryVectorStore::new();
        let err = store
            .add_vectors(vec![vec![1.0]], Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, VectorStoreError::LengthMismatch { .. }));
        assert!(store.is_empty().await);
    }
}
