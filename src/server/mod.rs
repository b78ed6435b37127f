//! Web shell for interactive captioning.
//!
//! Serves a single page where a user uploads one JPEG/PNG, picks a tone and
//! asks for a caption. The uploaded image and the caption (or error text) are
//! rendered back on the same page. A JSON endpoint exposes the same flow with
//! a tagged error body.

mod handlers;
mod routes;
mod templates;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::types::GeminiCaptionConfig;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared state for the web server. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
    pub config: Arc<GeminiCaptionConfig>,
}

impl AppState {
    pub fn new(client: reqwest::Client, config: GeminiCaptionConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }
}

/// Start the web server and run until Ctrl-C.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
