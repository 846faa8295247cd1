//! JSON-RPC endpoint.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};

use crate::state::AppState;

/// `POST /mcp`: one JSON-RPC message per request.
///
/// Requests get `200` with a JSON-RPC response body. Notifications get `202`
/// with an empty body.
pub async fn mcp_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match state.handler.handle_body(&body).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Create JSON-RPC routes.
pub fn mcp_routes() -> Router<AppState> {
    Router::new().route("/mcp", post(mcp_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use axum::body::Body;
    use axum::http::{Request, header};
    use ccbridge_core::{BridgeConfig, MockRunner, StaticLocator, ToolAdapter};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app(runner: MockRunner) -> Router {
        let adapter = ToolAdapter::with_components(
            BridgeConfig::default(),
            Arc::new(runner),
            Arc::new(StaticLocator::missing()),
        );
        mcp_routes().with_state(AppState::new(adapter, ServerConfig::default()))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/mcp")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_query_roundtrip() {
        let response = app(MockRunner::with_stdout("4"))
            .oneshot(post_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "tools/call",
                "params": {"name": "claude_code_query", "arguments": {"prompt": "2+2?"}}
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["isError"], false);
        let result: Value =
            serde_json::from_str(body["result"]["content"][0]["text"].as_str().unwrap()).unwrap();
        assert_eq!(result["output"], "4");
        assert_eq!(result["command"], "claude --model sonnet --print 2+2?");
    }

    #[tokio::test]
    async fn test_notification_accepted() {
        let response = app(MockRunner::new(vec![]))
            .oneshot(post_json(json!({
                "jsonrpc": "2.0",
                "method": "notifications/initialized"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_body_is_parse_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from("<<<"))
            .unwrap();
        let response = app(MockRunner::new(vec![])).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], -32700);
        assert_eq!(body["id"], Value::Null);
    }

    #[tokio::test]
    async fn test_get_not_allowed() {
        let request = Request::builder()
            .method("GET")
            .uri("/mcp")
            .body(Body::empty())
            .unwrap();
        let response = app(MockRunner::new(vec![])).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
