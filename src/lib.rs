use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;
pub mod postman_client;

use postman_client::PostmanApi;

#[derive(Clone)]
pub struct AppState {
    pub mcp_token: Arc<str>,
    pub postman: Arc<dyn PostmanApi>,
}

impl AppState {
    pub fn new(mcp_token: String, postman: Arc<dyn PostmanApi>) -> Self {
        Self {
            mcp_token: Arc::<str>::from(mcp_token),
            postman,
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer_token,
        ));

    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .merge(protected)
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::tools::testing::RecordingApi;
    use crate::postman_client::{ApiError, ApiResponse, ContentType, HttpMethod};

    use super::*;

    const TOKEN: &str = "token-1234567890ab";

    fn app_with(api: Arc<RecordingApi>) -> Router {
        build_app(AppState::new(TOKEN.to_string(), api))
    }

    fn ok_api() -> Arc<RecordingApi> {
        Arc::new(RecordingApi::responding(|| {
            Ok(ApiResponse::Json(json!({"collection": {"uid": "12345-abc"}})))
        }))
    }

    fn mcp_request(body: Value) -> Request<Body> {
        Request::builder()
            .uri("/mcp")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
            .body(Body::from(body.to_string()))
            .expect("request build")
    }

    fn tool_call(name: &str, arguments: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {"name": name, "arguments": arguments}
        })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        serde_json::from_slice(&body).expect("valid json response")
    }

    #[tokio::test]
    async fn health_is_public() {
        let response = app_with(ok_api())
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        assert_eq!(body, "{\"status\":\"ok\"}");
    }

    #[tokio::test]
    async fn discovery_is_public() {
        let response = app_with(ok_api())
            .oneshot(
                Request::builder()
                    .uri("/.well-known/mcp")
                    .method("GET")
                    .body(Body::empty())
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["mcp_endpoint"], "/mcp");
        assert_eq!(body["tool_count"], 48);
    }

    #[tokio::test]
    async fn mcp_requires_token() {
        let response = app_with(ok_api())
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn mcp_rejects_wrong_token() {
        let response = app_with(ok_api())
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, "Bearer not-the-token")
                    .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["code"], "invalid_token");
    }

    #[tokio::test]
    async fn mcp_unknown_method_returns_method_not_found() {
        let response = app_with(ok_api())
            .oneshot(mcp_request(
                json!({"jsonrpc": "2.0", "id": 1, "method": "resources/list"}),
            ))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32601);
    }

    #[tokio::test]
    async fn mcp_parse_error() {
        let response = app_with(ok_api())
            .oneshot(
                Request::builder()
                    .uri("/mcp")
                    .method("POST")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .body(Body::from("{not json"))
                    .expect("request build"),
            )
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn initialize_advertises_tools_only() {
        let response = app_with(ok_api())
            .oneshot(mcp_request(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "initialize",
                "params": {
                    "protocolVersion": "2024-11-05",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0.0"}
                }
            })))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(body["result"]["serverInfo"]["name"], env!("CARGO_PKG_NAME"));
        assert!(body["result"]["capabilities"]["tools"].is_object());
        assert!(body["result"]["capabilities"]["resources"].is_null());
    }

    #[tokio::test]
    async fn tools_list_contains_catalogue() {
        let response = app_with(ok_api())
            .oneshot(mcp_request(
                json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
            ))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        let tools = body["result"]["tools"].as_array().expect("tools array");
        assert_eq!(tools.len(), 48);
        let fork = tools
            .iter()
            .find(|tool| tool["name"] == "fork_collection")
            .expect("fork_collection tool");
        assert!(fork["inputSchema"]["properties"]["collection_id"].is_object());
    }

    #[tokio::test]
    async fn fork_collection_dispatches_post() {
        let api = ok_api();
        let response = app_with(api.clone())
            .oneshot(mcp_request(tool_call(
                "fork_collection",
                json!({"collection_id": "abc123", "workspace": "w1", "label": "my-fork"}),
            )))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(
            body["result"]["structuredContent"]["collection"]["uid"],
            "12345-abc"
        );

        let recorded = api.last();
        assert_eq!(recorded.endpoint, "/collections/fork/abc123?workspace=w1");
        assert_eq!(recorded.options.method, HttpMethod::Post);
        assert_eq!(
            recorded.options.body.as_deref(),
            Some(r#"{"label":"my-fork"}"#)
        );
    }

    #[tokio::test]
    async fn delete_returns_null_text_on_empty_response() {
        let api = Arc::new(RecordingApi::responding(|| Ok(ApiResponse::Empty)));
        let response = app_with(api.clone())
            .oneshot(mcp_request(tool_call(
                "delete_environment",
                json!({"environment_id": "e1"}),
            )))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["result"]["content"][0]["text"], "null");
        assert_eq!(api.last().options.method, HttpMethod::Delete);
        assert_eq!(api.last().endpoint, "/environments/e1");
    }

    #[tokio::test]
    async fn patch_environment_sends_json_patch() {
        let api = ok_api();
        app_with(api.clone())
            .oneshot(mcp_request(tool_call(
                "patch_environment",
                json!({
                    "environment_id": "e1",
                    "operations": r#"[{"op":"replace","path":"/name","value":"Prod"}]"#
                }),
            )))
            .await
            .expect("request execution");

        assert_eq!(
            api.last().options.content_type,
            Some(ContentType::JsonPatch)
        );
    }

    #[tokio::test]
    async fn invalid_identifier_never_reaches_api() {
        let api = ok_api();
        let response = app_with(api.clone())
            .oneshot(mcp_request(tool_call(
                "get_collection",
                json!({"collection_id": "../workspaces"}),
            )))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["error"]["data"]["code"], "invalid_identifier");
        assert_eq!(api.count(), 0);
    }

    #[tokio::test]
    async fn missing_required_argument_is_invalid_params() {
        let api = ok_api();
        let response = app_with(api.clone())
            .oneshot(mcp_request(tool_call("get_workspace", json!({}))))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(api.count(), 0);
    }

    #[tokio::test]
    async fn unknown_tool_is_method_not_found() {
        let response = app_with(ok_api())
            .oneshot(mcp_request(tool_call("list_logs", json!({}))))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32601);
        assert_eq!(body["error"]["data"]["code"], "tool_not_found");
    }

    #[tokio::test]
    async fn upstream_rejection_is_protocol_error() {
        let api = Arc::new(RecordingApi::responding(|| {
            Err(ApiError::from_status(
                400,
                r#"{"error":{"name":"malformedRequestError"}}"#.to_string(),
            ))
        }));
        let response = app_with(api)
            .oneshot(mcp_request(tool_call(
                "get_workspace",
                json!({"workspace_id": "w1"}),
            )))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32602);
        assert_eq!(body["error"]["data"]["details"]["status"], 400);
    }

    #[tokio::test]
    async fn comment_failures_are_error_results() {
        let api = Arc::new(RecordingApi::responding(|| Err(ApiError::MissingApiKey)));
        let response = app_with(api)
            .oneshot(mcp_request(tool_call(
                "get_collection_comments",
                json!({"collection_uid": "12345-c1"}),
            )))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        assert!(body.get("error").is_none());
        assert_eq!(body["result"]["isError"], true);
        assert!(body["result"]["content"][0]["text"]
            .as_str()
            .expect("text content")
            .contains("API key is required"));
    }

    #[tokio::test]
    async fn batch_skips_notifications() {
        let response = app_with(ok_api())
            .oneshot(mcp_request(json!([
                {"jsonrpc": "2.0", "id": 1, "method": "ping"},
                {"jsonrpc": "2.0", "method": "notifications/initialized"}
            ])))
            .await
            .expect("request execution");

        let body = json_body(response).await;
        let responses = body.as_array().expect("batch response");
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 1);
    }
}
