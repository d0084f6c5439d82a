//! Application startup and lifecycle management.

use crate::config::ChatbotConfig;
use crate::handlers::{
    agent::page_bot,
    article::{create_article, list_articles},
    bot::{simple_bot, translate_bot},
    health_check,
    hello::{hello_get, hello_post},
    member_bot::{mix_bot, pdf_bot, pdf_pinecone_bot},
    method_not_supported,
    metrics::metrics,
};
use crate::services::documents::{PdfLoader, WebPageLoader};
use crate::services::providers::gemini::{GeminiChatProvider, GeminiConfig};
use crate::services::providers::openai::{
    OpenAiChatProvider, OpenAiConfig, OpenAiEmbeddingProvider,
};
use crate::services::providers::{ChatProvider, EmbeddingProvider};
use crate::services::vector_store::{PineconeConfig, PineconeStore, VectorStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::tracing::request_id_middleware;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub openai_chat: Arc<dyn ChatProvider>,
    pub gemini_chat: Arc<dyn ChatProvider>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
    pub pdf_store: Arc<dyn VectorStore>,
    pub pdf_loader: Arc<PdfLoader>,
    pub page_loader: Arc<WebPageLoader>,
}

impl AppState {
    /// Wire the hosted providers and stores described by `config`.
    pub fn from_config(config: &ChatbotConfig) -> Self {
        let openai_chat = OpenAiChatProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            base_url: config.openai.base_url.clone(),
            model: config.openai.chat_model.clone(),
        });
        let embeddings = OpenAiEmbeddingProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            base_url: config.openai.base_url.clone(),
            model: config.openai.embedding_model.clone(),
        });
        let gemini_chat = GeminiChatProvider::new(GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            base_url: config.gemini.base_url.clone(),
            model: config.gemini.chat_model.clone(),
        });
        let pdf_store = PineconeStore::new(PineconeConfig {
            api_key: config.pinecone.api_key.clone(),
            index: config.pinecone.index.clone(),
            namespace: config.pinecone.namespace.clone(),
            control_plane_url: config.pinecone.control_plane_url.clone(),
        });

        if config.openai.api_key.is_empty() {
            tracing::warn!("OPENAI_API_KEY is not set; OpenAI-backed routes will fail");
        }
        if config.gemini.api_key.is_empty() {
            tracing::warn!("GOOGLE_API_KEY is not set; Gemini-backed routes will fail");
        }
        if config.pinecone.api_key.is_empty() || config.pinecone.index.is_empty() {
            tracing::warn!("Pinecone is not configured; /api/pdfpineconebot will fail");
        }

        tracing::info!(
            openai_model = %config.openai.chat_model,
            embedding_model = %config.openai.embedding_model,
            gemini_model = %config.gemini.chat_model,
            pdf_path = %config.documents.pdf_path,
            page_url = %config.documents.page_url,
            "Initialized providers"
        );

        Self {
            openai_chat: Arc::new(openai_chat),
            gemini_chat: Arc::new(gemini_chat),
            embeddings: Arc::new(embeddings),
            pdf_store: Arc::new(pdf_store),
            pdf_loader: Arc::new(PdfLoader::new(&config.documents.pdf_path)),
            page_loader: Arc::new(WebPageLoader::new(&config.documents.page_url)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/hello",
            get(hello_get)
                .post(hello_post)
                .fallback(method_not_supported),
        )
        .route(
            "/article",
            get(list_articles)
                .post(create_article)
                .fallback(method_not_supported),
        )
        .route(
            "/bot/simplebot",
            post(simple_bot).fallback(method_not_supported),
        )
        .route(
            "/bot/translatebot",
            post(translate_bot).fallback(method_not_supported),
        )
        .route("/mixbot", post(mix_bot).fallback(method_not_supported))
        .route("/pdfbot", post(pdf_bot).fallback(method_not_supported))
        .route(
            "/pdfpineconebot",
            post(pdf_pinecone_bot).fallback(method_not_supported),
        )
        .route(
            "/agent/pagebot",
            post(page_bot).fallback(method_not_supported),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .nest("/api", api)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: ChatbotConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config);
        Self::with_state(config, state).await
    }

    /// Build the application around an already-wired state.
    pub async fn with_state(config: ChatbotConfig, state: AppState) -> Result<Self, AppError> {
        // Port 0 binds a random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Chatbot service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| {
                tracing::error!("HTTP server error: {}", e);
                e
            })
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
