//! HTTP server
//!
//! JSON endpoints for training, evaluation, prediction and dataset upload,
//! plus a small embedded HTML client at `/ui`.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::ServerError;
pub use state::AppState;

use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: String,
    pub models_dir: String,
    pub max_upload_size: usize,
    /// Single allowed origin; `None` or `*` allows any
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            models_dir: std::env::var("MODELS_DIR").unwrap_or_else(|_| "./models".to_string()),
            max_upload_size: std::env::var("MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100 * 1024 * 1024), // 100MB
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|o| !o.is_empty()),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        data_dir = %config.data_dir,
        models_dir = %config.models_dir,
        "Initializing server directories"
    );

    std::fs::create_dir_all(&config.data_dir)?;
    std::fs::create_dir_all(&config.models_dir)?;

    let state = Arc::new(AppState::new(config.clone()));
    let app = create_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!(
        address = %addr,
        max_upload_size_mb = config.max_upload_size / 1024 / 1024,
        started_at = %start_time.to_rfc3339(),
        "House price API starting"
    );
    info!(url = %format!("http://{}/ui", addr), "Web UI available");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 8000);
        }
        if std::env::var("MAX_UPLOAD_SIZE").is_err() {
            assert_eq!(config.max_upload_size, 100 * 1024 * 1024);
        }
    }
}
