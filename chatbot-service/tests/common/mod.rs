//! Shared helpers for the chatbot-service integration tests.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request},
    Router,
};
use chatbot_service::services::documents::{PdfLoader, WebPageLoader};
use chatbot_service::services::providers::mock::{MockChatProvider, MockEmbeddingProvider};
use chatbot_service::services::vector_store::MemoryVectorStore;
use chatbot_service::startup::{build_router, AppState};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const MISSING_PDF: &str = "tests/fixtures/missing.pdf";
pub const TWO_PAGE_PDF: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/two_pages.pdf");
pub const UNREACHABLE_PAGE: &str = "http://127.0.0.1:9/page";

/// State wired to in-process mocks; nothing leaves the test process.
pub fn mock_state() -> AppState {
    AppState {
        openai_chat: Arc::new(MockChatProvider::new()),
        gemini_chat: Arc::new(MockChatProvider::new()),
        embeddings: Arc::new(MockEmbeddingProvider::new()),
        pdf_store: Arc::new(MemoryVectorStore::new()),
        pdf_loader: Arc::new(PdfLoader::new(MISSING_PDF)),
        page_loader: Arc::new(WebPageLoader::new(UNREACHABLE_PAGE)),
    }
}

pub fn app() -> Router {
    build_router(mock_state())
}

/// Send one request and return the HTTP status with the parsed JSON body.
pub async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
    }
    let request = builder
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, value)
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (u16, Value) {
    send(app, Method::POST, uri, Some(body)).await
}
