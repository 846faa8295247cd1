//! HTTP routes.

pub mod health;
pub mod mcp;

pub use health::{HealthResponse, health, health_routes};
pub use mcp::{mcp_handler, mcp_routes};
