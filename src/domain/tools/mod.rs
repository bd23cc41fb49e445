//! Postman operations exposed as MCP tools
//!
//! Every tool is a typed parameter struct whose input schema is derived by the SDK
//! macros. A tool only knows how to turn its arguments into a [`ToolRequest`]; the
//! pipeline in this module dispatches that request through [`PostmanApi`] and shapes
//! the outcome into a `CallToolResult` or a JSON-RPC error.

pub mod collections;
pub mod comments;
pub mod environments;
pub mod items;
pub mod mocks;
pub mod specs;
pub mod user;
pub mod workspaces;

use std::time::Instant;

use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::logging::log_tool_outcome;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::postman_client::{ApiResponse, ContentType, HttpMethod, PostmanApi, RequestOptions};
use crate::{errors::AppError, AppState};

use collections::*;
use comments::*;
use environments::*;
use items::*;
use mocks::*;
use specs::*;
use user::*;
use workspaces::*;

/// How a tool reports a failed call to the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Fail the JSON-RPC call with an error object.
    ProtocolError,
    /// Succeed the JSON-RPC call with an `isError` tool result carrying the message.
    ErrorResult,
}

/// Outbound call produced from validated tool arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolRequest {
    pub method: HttpMethod,
    pub endpoint: String,
    pub body: Option<Value>,
    pub content_type: Option<ContentType>,
}

impl ToolRequest {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            body: None,
            content_type: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = Some(content_type);
        self
    }

    pub fn into_parts(self) -> (String, RequestOptions) {
        let options = RequestOptions {
            method: self.method,
            body: self.body.map(|body| body.to_string()),
            content_type: self.content_type,
            ..RequestOptions::default()
        };
        (self.endpoint, options)
    }
}

pub trait PostmanTool: DeserializeOwned {
    const FAILURE_MODE: FailureMode = FailureMode::ProtocolError;

    fn into_request(self) -> Result<ToolRequest, AppError>;
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![
        GetWorkspacesTool::tool(),
        GetWorkspaceTool::tool(),
        CreateWorkspaceTool::tool(),
        UpdateWorkspaceTool::tool(),
        DeleteWorkspaceTool::tool(),
        GetCollectionsTool::tool(),
        GetCollectionTool::tool(),
        CreateCollectionTool::tool(),
        UpdateCollectionTool::tool(),
        PatchCollectionTool::tool(),
        DeleteCollectionTool::tool(),
        ForkCollectionTool::tool(),
        GetCollectionForksTool::tool(),
        MergeCollectionForkTool::tool(),
        PullCollectionChangesTool::tool(),
        GetCollectionRequestTool::tool(),
        CreateCollectionRequestTool::tool(),
        DeleteCollectionRequestTool::tool(),
        CreateCollectionFolderTool::tool(),
        DeleteCollectionFolderTool::tool(),
        GetCollectionCommentsTool::tool(),
        CreateCollectionCommentTool::tool(),
        UpdateCollectionCommentTool::tool(),
        DeleteCollectionCommentTool::tool(),
        GetEnvironmentsTool::tool(),
        GetEnvironmentTool::tool(),
        CreateEnvironmentTool::tool(),
        UpdateEnvironmentTool::tool(),
        PatchEnvironmentTool::tool(),
        DeleteEnvironmentTool::tool(),
        ForkEnvironmentTool::tool(),
        GetMocksTool::tool(),
        GetMockTool::tool(),
        CreateMockTool::tool(),
        UpdateMockTool::tool(),
        DeleteMockTool::tool(),
        PublishMockTool::tool(),
        UnpublishMockTool::tool(),
        GetAllSpecsTool::tool(),
        GetSpecTool::tool(),
        CreateSpecTool::tool(),
        DeleteSpecTool::tool(),
        GetSpecFilesTool::tool(),
        GetSpecFileTool::tool(),
        CreateSpecFileTool::tool(),
        UpdateSpecFileTool::tool(),
        DeleteSpecFileTool::tool(),
        GetAuthenticatedUserTool::tool(),
    ]
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let name = tool_call.name.as_str();
    let arguments = json!(tool_call.arguments.unwrap_or_default());

    match name {
        "get_workspaces" => run_tool::<GetWorkspacesTool>(state, id, name, arguments).await,
        "get_workspace" => run_tool::<GetWorkspaceTool>(state, id, name, arguments).await,
        "create_workspace" => run_tool::<CreateWorkspaceTool>(state, id, name, arguments).await,
        "update_workspace" => run_tool::<UpdateWorkspaceTool>(state, id, name, arguments).await,
        "delete_workspace" => run_tool::<DeleteWorkspaceTool>(state, id, name, arguments).await,
        "get_collections" => run_tool::<GetCollectionsTool>(state, id, name, arguments).await,
        "get_collection" => run_tool::<GetCollectionTool>(state, id, name, arguments).await,
        "create_collection" => {
            run_tool::<CreateCollectionTool>(state, id, name, arguments).await
        }
        "update_collection" => {
            run_tool::<UpdateCollectionTool>(state, id, name, arguments).await
        }
        "patch_collection" => run_tool::<PatchCollectionTool>(state, id, name, arguments).await,
        "delete_collection" => {
            run_tool::<DeleteCollectionTool>(state, id, name, arguments).await
        }
        "fork_collection" => run_tool::<ForkCollectionTool>(state, id, name, arguments).await,
        "get_collection_forks" => {
            run_tool::<GetCollectionForksTool>(state, id, name, arguments).await
        }
        "merge_collection_fork" => {
            run_tool::<MergeCollectionForkTool>(state, id, name, arguments).await
        }
        "pull_collection_changes" => {
            run_tool::<PullCollectionChangesTool>(state, id, name, arguments).await
        }
        "get_collection_request" => {
            run_tool::<GetCollectionRequestTool>(state, id, name, arguments).await
        }
        "create_collection_request" => {
            run_tool::<CreateCollectionRequestTool>(state, id, name, arguments).await
        }
        "delete_collection_request" => {
            run_tool::<DeleteCollectionRequestTool>(state, id, name, arguments).await
        }
        "create_collection_folder" => {
            run_tool::<CreateCollectionFolderTool>(state, id, name, arguments).await
        }
        "delete_collection_folder" => {
            run_tool::<DeleteCollectionFolderTool>(state, id, name, arguments).await
        }
        "get_collection_comments" => {
            run_tool::<GetCollectionCommentsTool>(state, id, name, arguments).await
        }
        "create_collection_comment" => {
            run_tool::<CreateCollectionCommentTool>(state, id, name, arguments).await
        }
        "update_collection_comment" => {
            run_tool::<UpdateCollectionCommentTool>(state, id, name, arguments).await
        }
        "delete_collection_comment" => {
            run_tool::<DeleteCollectionCommentTool>(state, id, name, arguments).await
        }
        "get_environments" => run_tool::<GetEnvironmentsTool>(state, id, name, arguments).await,
        "get_environment" => run_tool::<GetEnvironmentTool>(state, id, name, arguments).await,
        "create_environment" => {
            run_tool::<CreateEnvironmentTool>(state, id, name, arguments).await
        }
        "update_environment" => {
            run_tool::<UpdateEnvironmentTool>(state, id, name, arguments).await
        }
        "patch_environment" => {
            run_tool::<PatchEnvironmentTool>(state, id, name, arguments).await
        }
        "delete_environment" => {
            run_tool::<DeleteEnvironmentTool>(state, id, name, arguments).await
        }
        "fork_environment" => run_tool::<ForkEnvironmentTool>(state, id, name, arguments).await,
        "get_mocks" => run_tool::<GetMocksTool>(state, id, name, arguments).await,
        "get_mock" => run_tool::<GetMockTool>(state, id, name, arguments).await,
        "create_mock" => run_tool::<CreateMockTool>(state, id, name, arguments).await,
        "update_mock" => run_tool::<UpdateMockTool>(state, id, name, arguments).await,
        "delete_mock" => run_tool::<DeleteMockTool>(state, id, name, arguments).await,
        "publish_mock" => run_tool::<PublishMockTool>(state, id, name, arguments).await,
        "unpublish_mock" => run_tool::<UnpublishMockTool>(state, id, name, arguments).await,
        "get_all_specs" => run_tool::<GetAllSpecsTool>(state, id, name, arguments).await,
        "get_spec" => run_tool::<GetSpecTool>(state, id, name, arguments).await,
        "create_spec" => run_tool::<CreateSpecTool>(state, id, name, arguments).await,
        "delete_spec" => run_tool::<DeleteSpecTool>(state, id, name, arguments).await,
        "get_spec_files" => run_tool::<GetSpecFilesTool>(state, id, name, arguments).await,
        "get_spec_file" => run_tool::<GetSpecFileTool>(state, id, name, arguments).await,
        "create_spec_file" => run_tool::<CreateSpecFileTool>(state, id, name, arguments).await,
        "update_spec_file" => run_tool::<UpdateSpecFileTool>(state, id, name, arguments).await,
        "delete_spec_file" => run_tool::<DeleteSpecFileTool>(state, id, name, arguments).await,
        "get_authenticated_user" => {
            run_tool::<GetAuthenticatedUserTool>(state, id, name, arguments).await
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": name,
                },
            })),
        ),
    }
}

async fn run_tool<T: PostmanTool>(
    state: &AppState,
    id: Option<Value>,
    name: &str,
    arguments: Value,
) -> Value {
    let params: T = match serde_json::from_value(arguments) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    let started_at = Instant::now();
    let outcome = execute(state.postman.as_ref(), params).await;
    log_tool_outcome(name, started_at, outcome.as_ref().err());

    match outcome {
        Ok(response) => json_rpc_result(id, success_result(response)),
        Err(err) => match T::FAILURE_MODE {
            FailureMode::ErrorResult => json_rpc_result(id, error_result(&err)),
            FailureMode::ProtocolError => app_error_to_json_rpc(id, err),
        },
    }
}

/// Validates the arguments and performs the Postman call for one tool.
pub async fn execute<T: PostmanTool>(
    api: &dyn PostmanApi,
    params: T,
) -> Result<ApiResponse, AppError> {
    let (endpoint, options) = params.into_request()?.into_parts();
    Ok(api.request(&endpoint, options).await?)
}

pub fn success_result(response: ApiResponse) -> Value {
    let value = response.into_value();
    let text = match &value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };

    serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(text, None, None))],
        is_error: None,
        meta: None,
        structured_content: value.as_object().cloned(),
    })
    .expect("tool result serialization")
}

pub fn error_result(err: &AppError) -> Value {
    serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            err.to_string(),
            None,
            None,
        ))],
        is_error: Some(true),
        meta: None,
        structured_content: None,
    })
    .expect("tool error result serialization")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::postman_client::{ApiError, ApiResponse, PostmanApi, RequestOptions};

    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub endpoint: String,
        pub options: RequestOptions,
    }

    /// In-memory Postman API that records calls and replays a fixed outcome.
    pub struct RecordingApi {
        pub requests: Mutex<Vec<RecordedRequest>>,
        respond: Box<dyn Fn() -> Result<ApiResponse, ApiError> + Send + Sync>,
    }

    impl RecordingApi {
        pub fn responding(
            respond: impl Fn() -> Result<ApiResponse, ApiError> + Send + Sync + 'static,
        ) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            }
        }

        pub fn last(&self) -> RecordedRequest {
            self.requests
                .lock()
                .expect("requests lock")
                .last()
                .cloned()
                .expect("at least one request")
        }

        pub fn count(&self) -> usize {
            self.requests.lock().expect("requests lock").len()
        }
    }

    #[async_trait]
    impl PostmanApi for RecordingApi {
        async fn request(
            &self,
            endpoint: &str,
            options: RequestOptions,
        ) -> Result<ApiResponse, ApiError> {
            self.requests
                .lock()
                .expect("requests lock")
                .push(RecordedRequest {
                    endpoint: endpoint.to_string(),
                    options,
                });
            (self.respond)()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use serde_json::json;

    use super::*;

    #[test]
    fn tool_names_are_unique() {
        let tools = build_tools_list();
        let names = tools
            .iter()
            .map(|tool| tool.name.clone())
            .collect::<HashSet<_>>();
        assert_eq!(names.len(), tools.len());
        assert_eq!(tools.len(), 48);
    }

    #[test]
    fn tool_request_serializes_body() {
        let (endpoint, options) = ToolRequest::post("/collections/fork/abc123?workspace=w1")
            .with_body(json!({"label": "my-fork"}))
            .into_parts();

        assert_eq!(endpoint, "/collections/fork/abc123?workspace=w1");
        assert_eq!(options.method, HttpMethod::Post);
        assert_eq!(options.body.as_deref(), Some(r#"{"label":"my-fork"}"#));
        assert!(options.content_type.is_none());
    }

    #[test]
    fn success_result_pretty_prints_json() {
        let result = success_result(ApiResponse::Json(json!({"collection": {"id": "xyz"}})));

        let text = result["content"][0]["text"].as_str().expect("text content");
        assert_eq!(
            serde_json::from_str::<Value>(text).expect("json text"),
            json!({"collection": {"id": "xyz"}})
        );
        assert_eq!(result["structuredContent"]["collection"]["id"], "xyz");
    }

    #[test]
    fn success_result_for_text_and_empty() {
        let text = success_result(ApiResponse::Text("plain body".to_string()));
        assert_eq!(text["content"][0]["text"], "plain body");

        let empty = success_result(ApiResponse::Empty);
        assert_eq!(empty["content"][0]["text"], "null");
    }

    #[test]
    fn error_result_flags_error() {
        let result = error_result(&AppError::bad_request(
            "invalid_identifier",
            "spec_id must not be empty",
        ));
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .expect("text content")
            .contains("spec_id must not be empty"));
    }
}
