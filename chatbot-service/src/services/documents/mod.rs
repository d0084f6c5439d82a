//! Document loading and chunking for the retrieval pipelines.

pub mod pdf;
pub mod splitter;
pub mod web;

pub use pdf::PdfLoader;
pub use splitter::RecursiveCharacterTextSplitter;
pub use web::WebPageLoader;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to parse document: {0}")]
    Parse(String),

    #[error("Document has no extractable text: {0}")]
    Empty(String),

    #[error("Invalid splitter settings: {0}")]
    InvalidSplitter(String),
}

/// A unit of text plus free-form metadata (`source`, page number, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub page_content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }
}
