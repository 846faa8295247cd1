//! Application state shared across handlers.

use std::sync::Arc;

use ccbridge_core::ToolAdapter;

use crate::config::ServerConfig;
use crate::handler::McpHandler;
use crate::protocol::ServerInfo;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// JSON-RPC dispatcher.
    pub handler: Arc<McpHandler>,

    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(adapter: ToolAdapter, config: ServerConfig) -> Self {
        let handler = McpHandler::new(
            Arc::new(adapter),
            ServerInfo::named(config.server_name.clone()),
        );
        Self {
            handler: Arc::new(handler),
            config: Arc::new(config),
        }
    }
}
