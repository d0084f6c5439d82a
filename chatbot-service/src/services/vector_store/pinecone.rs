//! Pinecone vector store over the data-plane REST API.
//!
//! Document text is stored in the vector metadata under `text`; nested
//! metadata objects are flattened to dotted keys since Pinecone only accepts
//! scalar and string-list values.

use super::{VectorStore, VectorStoreError};
use crate::services::documents::Document;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Pinecone control-plane base URL, used to resolve an index name to its host.
pub const PINECONE_CONTROL_PLANE: &str = "https://api.pinecone.io";

const API_VERSION: &str = "2024-07";
const UPSERT_BATCH_SIZE: usize = 100;
const TEXT_KEY: &str = "text";

#[derive(Debug, Clone)]
pub struct PineconeConfig {
    pub api_key: String,
    /// Index name, or the index host URL.
    pub index: String,
    pub namespace: Option<String>,
    pub control_plane_url: String,
}

pub struct PineconeStore {
    config: PineconeConfig,
    client: Client,
    host: OnceCell<String>,
}

impl PineconeStore {
    pub fn new(config: PineconeConfig) -> Self {
        Self {
            config,
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .unwrap_or_else(|_| Client::new()),
            host: OnceCell::new(),
        }
    }

    /// Data-plane host for the configured index, looked up once.
    async fn host(&self) -> Result<&str, VectorStoreError> {
        if self.config.api_key.is_empty() {
            return Err(VectorStoreError::NotConfigured(
                "Pinecone API key not configured".to_string(),
            ));
        }
        if self.config.index.is_empty() {
            return Err(VectorStoreError::NotConfigured(
                "Pinecone index not configured".to_string(),
            ));
        }

        self.host
            .get_or_try_init(|| async {
                if self.config.index.starts_with("http://")
                    || self.config.index.starts_with("https://")
                {
                    return Ok(self.config.index.trim_end_matches('/').to_string());
                }
                self.describe_index_host().await
            })
            .await
            .map(String::as_str)
    }

    async fn describe_index_host(&self) -> Result<String, VectorStoreError> {
        let url = format!(
            "{}/indexes/{}",
            self.config.control_plane_url.trim_end_matches('/'),
            self.config.index
        );

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(|e| VectorStoreError::NetworkError(e.to_string()))?;

        let description: IndexDescription = parse_response(response).await?;
        tracing::info!(index = %self.config.index, host = %description.host, "Resolved Pinecone index host");

        Ok(if description.host.starts_with("http") {
            description.host
        } else {
            format!("https://{}", description.host)
        })
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, VectorStoreError> {
        let host = self.host().await?;
        let response = self
            .client
            .post(format!("{}{}", host, path))
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| VectorStoreError::NetworkError(e.to_string()))?;

        parse_response(response).await
    }
}

async fn parse_response<R: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<R, VectorStoreError> {
    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();
        return Err(VectorStoreError::ApiError(format!(
            "Pinecone API error {}: {}",
            status, error_text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| VectorStoreError::ApiError(format!("Failed to parse response: {}", e)))
}

#[async_trait]
impl VectorStore for PineconeStore {
    fn name(&self) -> &'static str {
        "pinecone"
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

        let records: Vec<UpsertVector> = vectors
            .into_iter()
            .zip(documents)
            .map(|(values, doc)| UpsertVector {
                id: Uuid::new_v4().to_string(),
                values,
                metadata: to_pinecone_metadata(doc),
            })
            .collect();

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            let response: UpsertResponse = self
                .post(
                    "/vectors/upsert",
                    &UpsertRequest {
                        vectors: batch,
                        namespace: self.config.namespace.as_deref(),
                    },
                )
                .await?;
            tracing::debug!(upserted = response.upserted_count, "Upserted Pinecone batch");
        }

        Ok(())
    }

    async fn similarity_search_by_vector(
        &self,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<(Document, f32)>, VectorStoreError> {
        let response: QueryResponse = self
            .post(
                "/query",
                &QueryRequest {
                    vector: query,
                    top_k: k,
                    include_metadata: true,
                    namespace: self.config.namespace.as_deref(),
                },
            )
            .await?;

        Ok(response
            .matches
            .into_iter()
            .map(|m| (from_pinecone_metadata(m.metadata.unwrap_or_default()), m.score))
            .collect())
    }
}

fn to_pinecone_metadata(doc: Document) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, "", Value::Object(doc.metadata));
    flat.insert(TEXT_KEY.to_string(), Value::String(doc.page_content));
    flat
}

fn flatten_into(out: &mut Map<String, Value>, prefix: &str, value: Value) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(out, &path, nested);
            }
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other);
        }
    }
}

fn from_pinecone_metadata(mut metadata: Map<String, Value>) -> Document {
    let page_content = match metadata.remove(TEXT_KEY) {
        Some(Value::String(text)) => text,
        _ => String::new(),
    };
    Document {
        page_content,
        metadata,
    }
}

// ============================================================================
// Pinecone API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct UpsertVector {
    id: String,
    values: Vec<f32>,
    metadata: Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: &'a [UpsertVector],
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}
