use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::dtos::{ApiResponse, CreateArticleRequest};
use crate::error::ApiError;
use crate::models::article::{sample_articles, Article};

#[tracing::instrument]
pub async fn list_articles() -> ApiResponse<Vec<Article>> {
    ApiResponse::ok(sample_articles())
}

/// Echo the submitted article back as if it had been saved.
#[tracing::instrument(skip_all)]
pub async fn create_article(
    body: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<ApiResponse<Article>, ApiError> {
    let Json(req) = body?;
    let article = Article::create(req.title, req.contents, req.member_id);

    tracing::info!(member_id = article.created_member_id, "Article created");
    Ok(ApiResponse::ok(article))
}
