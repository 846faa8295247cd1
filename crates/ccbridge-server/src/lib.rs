//! MCP server exposing the ccbridge tools over HTTP.
//!
//! Each `POST /mcp` carries one JSON-RPC 2.0 message. Supported methods:
//!
//! - `initialize`, `ping`
//! - `tools/list`: advertises `claude_code_query` and `claude_code_status`
//! - `tools/call`: runs the tool through [`ccbridge_core::ToolAdapter`]
//!
//! Notifications (messages without an `id`) are acknowledged with `202`.
//!
//! # Example
//!
//! ```ignore
//! use ccbridge_core::{BridgeConfig, ToolAdapter};
//! use ccbridge_server::{Server, ServerConfig};
//!
//! let adapter = ToolAdapter::new(BridgeConfig::default());
//! let config = ServerConfig::new("127.0.0.1:8000".parse()?);
//!
//! Server::new(adapter, config).run().await?;
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod tools;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use handler::McpHandler;
pub use state::AppState;
pub use tools::{QUERY_TOOL, STATUS_TOOL};

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use ccbridge_core::ToolAdapter;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The ccbridge HTTP server.
pub struct Server {
    /// Application state.
    state: AppState,
}

impl Server {
    /// Create a new server around an adapter.
    pub fn new(adapter: ToolAdapter, config: ServerConfig) -> Self {
        Self {
            state: AppState::new(adapter, config),
        }
    }

    /// Build the router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::health_routes())
            .merge(routes::mcp_routes())
            .layer(DefaultBodyLimit::max(self.state.config.max_body_size))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Get the configured bind address.
    pub fn bind_address(&self) -> SocketAddr {
        self.state.config.bind_address
    }

    /// Bind the configured address and serve until the process ends.
    pub async fn run(self) -> Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.bind_address();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already-bound listener (useful for testing).
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        if let Ok(addr) = listener.local_addr() {
            info!("Starting server on {}", addr);
        }

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}
