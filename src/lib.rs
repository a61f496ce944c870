// NIM Proxy - OpenAI-compatible gateway in front of NVIDIA NIM

pub mod api;
pub mod config;
pub mod error;
pub mod proxy;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Load configuration, then serve until Ctrl-C.
///
/// Configuration errors are returned before any listener is bound.
pub async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    api::start_server(&config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
