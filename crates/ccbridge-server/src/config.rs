//! Server configuration.

use std::net::SocketAddr;

/// Default bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8000";

/// Default server name reported in `initialize`.
pub const DEFAULT_SERVER_NAME: &str = "Claude Code MCP Server";

/// Default max body size for JSON-RPC requests (1 MB).
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Server configuration.
///
/// Built once at startup and shared read-only by all handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_address: SocketAddr,

    /// Name reported to clients in `serverInfo`.
    pub server_name: String,

    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            server_name: DEFAULT_SERVER_NAME.to_string(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }
}

impl ServerConfig {
    /// Create a config bound to `addr`.
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            bind_address: addr,
            ..Default::default()
        }
    }

    /// Set the bind address.
    pub fn with_bind_address(mut self, addr: SocketAddr) -> Self {
        self.bind_address = addr;
        self
    }

    /// Set the server name.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Set the maximum request body size.
    pub fn with_max_body_size(mut self, size: usize) -> Self {
        self.max_body_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_constant() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS.parse().unwrap());
        assert_eq!(config.server_name, DEFAULT_SERVER_NAME);
    }

    #[test]
    fn test_builder() {
        let config = ServerConfig::default()
            .with_bind_address("0.0.0.0:9000".parse().unwrap())
            .with_server_name("bridge")
            .with_max_body_size(64);

        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.server_name, "bridge");
        assert_eq!(config.max_body_size, 64);
    }
}
