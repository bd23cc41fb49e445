//! API specification tools (Spec Hub)
//!
//! Failures are returned to the agent as error tool results rather than JSON-RPC errors.

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{FailureMode, PostmanTool, ToolRequest};
use crate::domain::utils::{
    file_path, json_array_payload, object, one_of, page_limit, path_id, require_changes,
    required_text, Endpoint,
};
use crate::errors::AppError;

pub const SPEC_TYPES: [&str; 3] = ["OPENAPI:3.0", "OPENAPI:3.1", "ASYNCAPI:2.0"];

#[macros::mcp_tool(
    name = "get_all_specs",
    description = "List the API specifications in a workspace"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAllSpecsTool {
    pub workspace_id: String,
    pub cursor: Option<String>,
    pub limit: Option<u32>,
}

impl PostmanTool for GetAllSpecsTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_id = path_id("workspace_id", &self.workspace_id)?;
        Ok(ToolRequest::get(
            Endpoint::new("/specs")
                .query("workspaceId", Some(workspace_id))
                .query("cursor", self.cursor)
                .query("limit", page_limit(self.limit)?)
                .build(),
        ))
    }
}

#[macros::mcp_tool(name = "get_spec", description = "Get an API specification")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSpecTool {
    pub spec_id: String,
}

impl PostmanTool for GetSpecTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        Ok(ToolRequest::get(format!("/specs/{spec_id}")))
    }
}

#[macros::mcp_tool(
    name = "create_spec",
    description = "Create an API specification from one or more files"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateSpecTool {
    pub workspace_id: String,
    pub name: String,
    /// One of: OPENAPI:3.0, OPENAPI:3.1, ASYNCAPI:2.0.
    pub spec_type: String,
    /// JSON array of files: `[{"path":"index.yaml","content":"openapi: 3.0.0 ..."}]`.
    pub files: String,
}

impl PostmanTool for CreateSpecTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_id = path_id("workspace_id", &self.workspace_id)?;
        let name = required_text("name", &self.name)?;
        let spec_type = one_of("spec_type", Some(self.spec_type), &SPEC_TYPES)?;
        let files = json_array_payload("files", &self.files)?;
        let files_valid = files.as_array().is_some_and(|items| {
            !items.is_empty()
                && items.iter().all(|file| {
                    file.get("path").and_then(Value::as_str).is_some()
                        && file.get("content").and_then(Value::as_str).is_some()
                })
        });
        if !files_valid {
            return Err(AppError::bad_request(
                "invalid_spec_files",
                "files must be a non-empty array of objects with path and content",
            ));
        }

        Ok(ToolRequest::post(
            Endpoint::new("/specs")
                .query("workspaceId", Some(workspace_id))
                .build(),
        )
        .with_body(json!({
            "name": name,
            "type": spec_type,
            "files": files,
        })))
    }
}

#[macros::mcp_tool(name = "delete_spec", description = "Delete an API specification")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteSpecTool {
    pub spec_id: String,
}

impl PostmanTool for DeleteSpecTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        Ok(ToolRequest::delete(format!("/specs/{spec_id}")))
    }
}

#[macros::mcp_tool(
    name = "get_spec_files",
    description = "List the files of an API specification"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSpecFilesTool {
    pub spec_id: String,
}

impl PostmanTool for GetSpecFilesTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        Ok(ToolRequest::get(format!("/specs/{spec_id}/files")))
    }
}

#[macros::mcp_tool(
    name = "get_spec_file",
    description = "Get the contents of one file of an API specification"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetSpecFileTool {
    pub spec_id: String,
    /// Path of the file within the specification, e.g. `components/schemas.yaml`.
    pub file_path: String,
}

impl PostmanTool for GetSpecFileTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        let path = file_path("file_path", &self.file_path)?;
        Ok(ToolRequest::get(format!("/specs/{spec_id}/files/{path}")))
    }
}

#[macros::mcp_tool(
    name = "create_spec_file",
    description = "Add a file to an API specification"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateSpecFileTool {
    pub spec_id: String,
    pub file_path: String,
    pub content: String,
}

impl PostmanTool for CreateSpecFileTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        let path = file_path("file_path", &self.file_path)?;
        Ok(ToolRequest::post(format!("/specs/{spec_id}/files"))
            .with_body(json!({ "path": path, "content": self.content })))
    }
}

#[macros::mcp_tool(
    name = "update_spec_file",
    description = "Update the content, name or root flag of a specification file"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateSpecFileTool {
    pub spec_id: String,
    pub file_path: String,
    pub content: Option<String>,
    /// New file name.
    pub name: Option<String>,
    /// Make this file the root file of a multi-file specification.
    pub root: Option<bool>,
}

impl PostmanTool for UpdateSpecFileTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        let path = file_path("file_path", &self.file_path)?;
        let update = object([
            ("content", self.content.map(Value::from)),
            ("name", self.name.map(Value::from)),
            ("root", self.root.map(Value::from)),
        ]);
        require_changes(&update, "content, name or root")?;

        Ok(ToolRequest::patch(format!("/specs/{spec_id}/files/{path}")).with_body(update))
    }
}

#[macros::mcp_tool(
    name = "delete_spec_file",
    description = "Delete a file from an API specification"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteSpecFileTool {
    pub spec_id: String,
    pub file_path: String,
}

impl PostmanTool for DeleteSpecFileTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let spec_id = path_id("spec_id", &self.spec_id)?;
        let path = file_path("file_path", &self.file_path)?;
        Ok(ToolRequest::delete(format!("/specs/{spec_id}/files/{path}")))
    }
}
