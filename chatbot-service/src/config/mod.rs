use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

use crate::services::providers::gemini::GEMINI_API_BASE;
use crate::services::providers::openai::OPENAI_API_BASE;
use crate::services::vector_store::pinecone::PINECONE_CONTROL_PLANE;

pub const DEFAULT_PDF_PATH: &str = "example_data/Manual.pdf";
pub const DEFAULT_PAGE_URL: &str = "https://yozm.wishket.com/magazine/detail/2702/";

#[derive(Debug, Clone, Deserialize)]
pub struct ChatbotConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub gemini: GeminiSettings,
    pub pinecone: PineconeSettings,
    pub documents: DocumentSettings,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: String,
    pub base_url: String,
    pub chat_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PineconeSettings {
    pub api_key: String,
    /// Index name or index host URL.
    pub index: String,
    pub namespace: Option<String>,
    pub control_plane_url: String,
}

/// Sources for the retrieval bots.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentSettings {
    pub pdf_path: String,
    pub page_url: String,
}

impl ChatbotConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ChatbotConfig {
            common: common_config,
            openai: OpenAiSettings {
                api_key: get_env("OPENAI_API_KEY", Some(""), is_prod)?,
                base_url: get_env("OPENAI_BASE_URL", Some(OPENAI_API_BASE), is_prod)?,
                chat_model: get_env("OPENAI_CHAT_MODEL", Some("gpt-4o"), is_prod)?,
                embedding_model: get_env(
                    "OPENAI_EMBEDDING_MODEL",
                    Some("text-embedding-3-small"),
                    is_prod,
                )?,
            },
            gemini: GeminiSettings {
                api_key: get_env("GOOGLE_API_KEY", Some(""), is_prod)?,
                base_url: get_env("GEMINI_BASE_URL", Some(GEMINI_API_BASE), is_prod)?,
                chat_model: get_env("GEMINI_CHAT_MODEL", Some("gemini-pro"), is_prod)?,
            },
            pinecone: PineconeSettings {
                api_key: get_env("PINECONE_API_KEY", Some(""), is_prod)?,
                index: get_env("PINECONE_INDEX", Some(""), is_prod)?,
                namespace: optional_env("PINECONE_NAMESPACE"),
                control_plane_url: get_env(
                    "PINECONE_CONTROL_PLANE_URL",
                    Some(PINECONE_CONTROL_PLANE),
                    is_prod,
                )?,
            },
            documents: DocumentSettings {
                pdf_path: get_env("PDF_PATH", Some(DEFAULT_PDF_PATH), is_prod)?,
                page_url: get_env("PAGE_URL", Some(DEFAULT_PAGE_URL), is_prod)?,
            },
            otlp_endpoint: optional_env("OTLP_ENDPOINT"),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Unset and empty both mean "not configured".
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
