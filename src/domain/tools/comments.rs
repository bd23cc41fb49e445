//! Collection comment tools
//!
//! Failures are returned to the agent as error tool results rather than JSON-RPC errors.

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FailureMode, PostmanTool, ToolRequest};
use crate::domain::utils::{object, path_id};
use crate::errors::AppError;

pub const MAX_COMMENT_LENGTH: usize = 10_000;

#[macros::mcp_tool(
    name = "get_collection_comments",
    description = "List the comments left on a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCollectionCommentsTool {
    pub collection_uid: String,
}

impl PostmanTool for GetCollectionCommentsTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_uid = path_id("collection_uid", &self.collection_uid)?;
        Ok(ToolRequest::get(format!(
            "/collections/{collection_uid}/comments"
        )))
    }
}

#[macros::mcp_tool(
    name = "create_collection_comment",
    description = "Comment on a collection, or reply within an existing thread"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCollectionCommentTool {
    pub collection_uid: String,
    /// Comment text, up to 10,000 characters.
    pub body: String,
    /// Thread to reply to.
    pub thread_id: Option<u64>,
}

impl PostmanTool for CreateCollectionCommentTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_uid = path_id("collection_uid", &self.collection_uid)?;
        let body = comment_body(&self.body)?;
        Ok(
            ToolRequest::post(format!("/collections/{collection_uid}/comments")).with_body(
                object([
                    ("body", Some(Value::from(body))),
                    ("threadId", self.thread_id.map(Value::from)),
                ]),
            ),
        )
    }
}

#[macros::mcp_tool(
    name = "update_collection_comment",
    description = "Edit a comment on a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateCollectionCommentTool {
    pub collection_uid: String,
    pub comment_id: String,
    pub body: String,
}

impl PostmanTool for UpdateCollectionCommentTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_uid = path_id("collection_uid", &self.collection_uid)?;
        let comment_id = path_id("comment_id", &self.comment_id)?;
        let body = comment_body(&self.body)?;
        Ok(ToolRequest::put(format!(
            "/collections/{collection_uid}/comments/{comment_id}"
        ))
        .with_body(serde_json::json!({ "body": body })))
    }
}

#[macros::mcp_tool(
    name = "delete_collection_comment",
    description = "Delete a comment from a collection. Deleting a thread's first comment deletes the thread"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCollectionCommentTool {
    pub collection_uid: String,
    pub comment_id: String,
}

impl PostmanTool for DeleteCollectionCommentTool {
    const FAILURE_MODE: FailureMode = FailureMode::ErrorResult;

    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_uid = path_id("collection_uid", &self.collection_uid)?;
        let comment_id = path_id("comment_id", &self.comment_id)?;
        Ok(ToolRequest::delete(format!(
            "/collections/{collection_uid}/comments/{comment_id}"
        )))
    }
}

fn comment_body(body: &str) -> Result<String, AppError> {
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_COMMENT_LENGTH {
        return Err(AppError::bad_request(
            "invalid_comment",
            format!("body must contain between 1 and {MAX_COMMENT_LENGTH} characters"),
        ));
    }
    Ok(trimmed.to_string())
}
