//! Request bodies accepted by the API routes.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateRequest {
    /// System instruction, e.g. "translate the user's message into English".
    pub role: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberChatRequest {
    pub message: String,
    #[serde(default)]
    pub nick_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MixBotRequest {
    pub message: String,
    #[serde(default)]
    pub nick_name: Option<String>,
    pub bot_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    #[serde(default)]
    pub contents: Option<String>,
    pub member_id: i64,
}
