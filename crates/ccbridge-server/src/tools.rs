//! Tool catalog and `tools/call` dispatch.

use ccbridge_core::{QueryRequest, ToolAdapter};
use serde::Serialize;
use serde_json::{Value, json};

use crate::protocol::{CallToolParams, CallToolResult, JsonRpcError, ToolInfo};

/// Name of the query tool.
pub const QUERY_TOOL: &str = "claude_code_query";

/// Name of the status tool.
pub const STATUS_TOOL: &str = "claude_code_status";

/// Tool definitions advertised by `tools/list`.
pub fn tool_definitions(default_model: &str) -> Vec<ToolInfo> {
    vec![
        ToolInfo {
            name: QUERY_TOOL.to_string(),
            description: Some(
                "Send a query to Claude Code in print mode (non-interactive). \
                 Returns status, output, and execution details."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "The query or task to send to Claude Code"
                    },
                    "model": {
                        "type": "string",
                        "description": "AI model to use (e.g. sonnet, opus, or a full model name)",
                        "default": default_model
                    },
                    "output_format": {
                        "type": "string",
                        "enum": ["text", "json", "stream-json"],
                        "description": "Output format",
                        "default": "text"
                    }
                },
                "required": ["prompt"]
            }),
        },
        ToolInfo {
            name: STATUS_TOOL.to_string(),
            description: Some(
                "Get Claude Code status: checks that the CLI is installed and responsive."
                    .to_string(),
            ),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// Run a `tools/call` against the adapter.
///
/// Adapter failures come back as tool results with `isError: true`. Only
/// malformed calls (unknown tool, unusable arguments) are JSON-RPC errors.
pub async fn call_tool(
    adapter: &ToolAdapter,
    params: CallToolParams,
) -> Result<CallToolResult, JsonRpcError> {
    let arguments = match params.arguments {
        None | Some(Value::Null) => Value::Object(Default::default()),
        Some(Value::Object(map)) => Value::Object(map),
        Some(other) => {
            return Err(JsonRpcError::invalid_params(format!(
                "arguments must be an object, got {}",
                type_name(&other)
            )));
        }
    };

    match params.name.as_str() {
        QUERY_TOOL => {
            let request: QueryRequest = serde_json::from_value(arguments).map_err(|e| {
                JsonRpcError::invalid_params(format!("invalid {} arguments: {}", QUERY_TOOL, e))
            })?;
            let result = adapter.query(request).await;
            render(&result, result.is_error())
        }
        STATUS_TOOL => {
            let report = adapter.status().await;
            render(&report, report.is_error())
        }
        other => Err(JsonRpcError::invalid_params(format!("unknown tool: {}", other))),
    }
}

fn render<T: Serialize>(value: &T, is_error: bool) -> Result<CallToolResult, JsonRpcError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| JsonRpcError::internal(format!("failed to serialize tool result: {}", e)))?;
    Ok(CallToolResult::text(text, is_error))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
