//! JSON-RPC method dispatch.

use std::sync::Arc;

use ccbridge_core::ToolAdapter;
use serde::Serialize;
use serde_json::Value;

use crate::protocol::{
    CallToolParams, InitializeResult, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest,
    JsonRpcResponse, ListToolsResult, MCP_PROTOCOL_VERSION, ServerCapabilities, ServerInfo,
    ToolsCapability,
};
use crate::tools;

/// Handles MCP JSON-RPC messages against a [`ToolAdapter`].
#[derive(Clone)]
pub struct McpHandler {
    adapter: Arc<ToolAdapter>,
    server_info: ServerInfo,
}

impl McpHandler {
    /// Create a handler.
    pub fn new(adapter: Arc<ToolAdapter>, server_info: ServerInfo) -> Self {
        Self {
            adapter,
            server_info,
        }
    }

    /// The adapter tool calls are routed to.
    pub fn adapter(&self) -> &ToolAdapter {
        &self.adapter
    }

    /// Handle a raw message body.
    ///
    /// Returns `None` for notifications.
    pub async fn handle_body(&self, body: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "unparseable JSON-RPC body");
                return Some(JsonRpcResponse::failure(
                    Value::Null,
                    JsonRpcError::parse_error(format!("parse error: {}", e)),
                ));
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::failure(
                    id,
                    JsonRpcError::invalid_request(format!("invalid request: {}", e)),
                ));
            }
        };

        self.handle(request).await
    }

    /// Handle a decoded request or notification.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %request.method, id = ?request.id, "JSON-RPC message");

        let Some(id) = request.id.clone() else {
            tracing::debug!(method = %request.method, "notification received");
            return None;
        };

        if request.jsonrpc != JSONRPC_VERSION {
            return Some(JsonRpcResponse::failure(
                id,
                JsonRpcError::invalid_request(format!(
                    "unsupported jsonrpc version: {}",
                    request.jsonrpc
                )),
            ));
        }

        let result = match request.method.as_str() {
            "initialize" => to_value(&self.initialize()),
            "ping" => Ok(Value::Object(Default::default())),
            "tools/list" => to_value(&ListToolsResult {
                tools: tools::tool_definitions(&self.adapter.config().default_model),
            }),
            "tools/call" => self.call_tool(request.params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match result {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(error) => JsonRpcResponse::failure(id, error),
        })
    }

    fn initialize(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: self.server_info.clone(),
        }
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("missing params"))
            .and_then(|p| {
                serde_json::from_value(p)
                    .map_err(|e| JsonRpcError::invalid_params(format!("invalid params: {}", e)))
            })?;

        tracing::info!(tool = %params.name, "tool call");
        let result = tools::call_tool(&self.adapter, params).await?;
        to_value(&result)
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal(e.to_string()))
}
