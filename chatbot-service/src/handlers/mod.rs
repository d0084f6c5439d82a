//! HTTP handlers for chatbot-service.
//!
//! Every `/api` route answers with the `{code, data, msg}` envelope; `/health`
//! and `/metrics` are plain infrastructure endpoints.

pub mod agent;
pub mod article;
pub mod bot;
pub mod health;
pub mod hello;
pub mod member_bot;
pub mod metrics;

pub use health::health_check;

use crate::dtos::ApiResponse;

/// Method fallback for every API route.
pub async fn method_not_supported() -> ApiResponse<()> {
    ApiResponse::failed()
}
