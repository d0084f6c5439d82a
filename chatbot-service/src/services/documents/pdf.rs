use super::{Document, DocumentError};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Loads a PDF from disk, one [`Document`] per page.
#[derive(Debug, Clone)]
pub struct PdfLoader {
    path: PathBuf,
}

impl PdfLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<Document>, DocumentError> {
        let source = self.path.display().to_string();

        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| DocumentError::Io {
                path: source.clone(),
                source: e,
            })?;

        tracing::info!(path = %source, size = bytes.len(), "Extracting PDF text");

        let pages =
            tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem_by_pages(&bytes))
                .await
                .map_err(|e| DocumentError::Parse(e.to_string()))?
                .map_err(|e| DocumentError::Parse(format!("{}: {}", source, e)))?;

        let docs = pages_to_documents(&pages, &source);
        if docs.is_empty() {
            return Err(DocumentError::Empty(source));
        }

        tracing::info!(path = %source, pages = docs.len(), "Loaded PDF");
        Ok(docs)
    }
}

/// One document per extracted page, numbered from one; blank pages are dropped.
fn pages_to_documents(pages: &[String], source: &str) -> Vec<Document> {
    pages
        .iter()
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| {
            Document::new(page.trim())
                .with_metadata("source", source)
                .with_metadata("loc", json!({ "pageNumber": i + 1 }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_numbered_from_one_and_blank_pages_skipped() {
        let pages = ["first page", "   ", "third page"].map(String::from);
        let docs = pages_to_documents(&pages, "manual.pdf");

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page_content, "first page");
        assert_eq!(docs[0].metadata["loc"]["pageNumber"], 1);
        assert_eq!(docs[1].metadata["loc"]["pageNumber"], 3);
        assert_eq!(docs[1].metadata["source"], "manual.pdf");
    }

    #[tokio::test]
    async fn each_pdf_page_becomes_its_own_document() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/two_pages.pdf");
        let docs = PdfLoader::new(path).load().await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].page_content, "First page warranty");
        assert_eq!(docs[0].metadata["loc"]["pageNumber"], 1);
        assert_eq!(docs[1].page_content, "Second page reset");
        assert_eq!(docs[1].metadata["loc"]["pageNumber"], 2);
        assert_eq!(docs[1].metadata["source"], path);
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = PdfLoader::new("does/not/exist.pdf").load().await.unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
