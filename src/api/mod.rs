// HTTP API Server module

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

mod handlers;
pub mod nim;

use crate::config::AppConfig;
use crate::proxy::Gateway;
use nim::NimClient;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<Gateway>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = NimClient::new(
            config.nim_api_key.clone(),
            config.nim_api_base.clone(),
            config.request_timeout(),
        )?;
        let gateway = Gateway::new(config.model_mapping(), config.translation_options(), client);
        Ok(Self {
            gateway: Arc::new(gateway),
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Wrong methods on known paths get the same 404 as unknown paths
    Router::new()
        .route("/health", get(handlers::health).fallback(handlers::not_found))
        .route("/v1/models", get(handlers::openai_models).fallback(handlers::not_found))
        .route(
            "/v1/chat/completions",
            post(handlers::chat_completions).fallback(handlers::not_found),
        )
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves
pub async fn start_server<F>(config: &AppConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("API server listening on {}", addr);
    tracing::info!(
        "Upstream {} (show_reasoning={}, thinking_mode={})",
        config.nim_api_base,
        config.show_reasoning,
        config.enable_thinking_mode
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
