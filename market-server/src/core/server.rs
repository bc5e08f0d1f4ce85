//! Server Implementation
//!
//! HTTP + WebSocket 服务启动和管理

use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server over an initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve until Ctrl-C, then stop background tasks
    pub async fn run(&self) -> Result<()> {
        let state = self.state.clone();
        let tasks = state.start_background_tasks();

        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(ServerError::Bind)?;
        tracing::info!(
            addr = %addr,
            environment = %self.config.environment,
            "Market server listening"
        );

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        let app = crate::api::build_app(state);
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.into()));

        tasks.shutdown().await;
        served
    }
}
