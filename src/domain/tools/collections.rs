//! Collection tools
//!
//! Collection documents follow the Postman Collection Format v2.1. They are accepted
//! as JSON text and forwarded without further interpretation.

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{PostmanTool, ToolRequest};
use crate::domain::utils::{
    json_object_payload, object, one_of, page_limit, path_id, require_changes, required_text,
    Endpoint,
};
use crate::errors::AppError;

pub const MERGE_STRATEGIES: [&str; 2] = ["deleteSource", "updateSourceWithDestination"];
pub const SORT_DIRECTIONS: [&str; 2] = ["asc", "desc"];

#[macros::mcp_tool(
    name = "get_collections",
    description = "List collections, optionally restricted to a workspace or filtered by name"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCollectionsTool {
    pub workspace: Option<String>,
    /// Case-sensitive name filter.
    pub name: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl PostmanTool for GetCollectionsTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        Ok(ToolRequest::get(
            Endpoint::new("/collections")
                .query("workspace", workspace)
                .query("name", self.name)
                .query("limit", page_limit(self.limit)?)
                .query("offset", self.offset)
                .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "get_collection",
    description = "Get a collection. Use model=minimal for only the root-level request and folder IDs"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCollectionTool {
    pub collection_id: String,
    /// Collection read-only access key.
    pub access_key: Option<String>,
    /// `minimal` to return only the item structure.
    pub model: Option<String>,
}

impl PostmanTool for GetCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let model = one_of("model", self.model, &["minimal"])?;
        Ok(ToolRequest::get(
            Endpoint::new(format!("/collections/{collection_id}"))
                .query("access_key", self.access_key)
                .query("model", model)
                .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "create_collection",
    description = "Create a collection from a Postman Collection v2.1 JSON document"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCollectionTool {
    /// Workspace to create the collection in. Defaults to the user's default workspace.
    pub workspace: Option<String>,
    /// Collection JSON object with `info` and `item`.
    pub collection: String,
}

impl PostmanTool for CreateCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        let collection = json_object_payload("collection", &self.collection)?;
        Ok(ToolRequest::post(
            Endpoint::new("/collections")
                .query("workspace", workspace)
                .build(),
        )
        .with_body(json!({ "collection": collection })))
    }
}

#[macros::mcp_tool(
    name = "update_collection",
    description = "Replace a collection with a full Postman Collection v2.1 JSON document"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateCollectionTool {
    pub collection_id: String,
    pub collection: String,
}

impl PostmanTool for UpdateCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let collection = json_object_payload("collection", &self.collection)?;
        Ok(ToolRequest::put(format!("/collections/{collection_id}"))
            .with_body(json!({ "collection": collection })))
    }
}

#[macros::mcp_tool(
    name = "patch_collection",
    description = "Update only the name or description of a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct PatchCollectionTool {
    pub collection_id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl PostmanTool for PatchCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let info = object([
            ("name", self.name.map(Value::from)),
            ("description", self.description.map(Value::from)),
        ]);
        require_changes(&info, "name or description")?;

        Ok(ToolRequest::patch(format!("/collections/{collection_id}"))
            .with_body(json!({ "collection": { "info": info } })))
    }
}

#[macros::mcp_tool(name = "delete_collection", description = "Delete a collection")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCollectionTool {
    pub collection_id: String,
}

impl PostmanTool for DeleteCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        Ok(ToolRequest::delete(format!("/collections/{collection_id}")))
    }
}

#[macros::mcp_tool(
    name = "fork_collection",
    description = "Fork a collection into a workspace under the given fork label"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ForkCollectionTool {
    pub collection_id: String,
    /// Destination workspace ID.
    pub workspace: String,
    pub label: String,
}

impl PostmanTool for ForkCollectionTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let workspace = path_id("workspace", &self.workspace)?;
        let label = required_text("label", &self.label)?;
        Ok(ToolRequest::post(
            Endpoint::new(format!("/collections/fork/{collection_id}"))
                .query("workspace", Some(workspace))
                .build(),
        )
        .with_body(json!({ "label": label })))
    }
}

#[macros::mcp_tool(
    name = "get_collection_forks",
    description = "List the forks of a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCollectionForksTool {
    pub collection_id: String,
    /// Pagination cursor from a previous response.
    pub cursor: Option<String>,
    pub limit: Option<u32>,
    /// Sort by creation date: asc or desc.
    pub direction: Option<String>,
}

impl PostmanTool for GetCollectionForksTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let direction = one_of("direction", self.direction, &SORT_DIRECTIONS)?;
        Ok(ToolRequest::get(
            Endpoint::new(format!("/collections/{collection_id}/forks"))
                .query("cursor", self.cursor)
                .query("limit", page_limit(self.limit)?)
                .query("direction", direction)
                .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "merge_collection_fork",
    description = "Merge a forked collection back into its parent collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct MergeCollectionForkTool {
    /// UID of the forked collection.
    pub source: String,
    /// UID of the parent collection.
    pub destination: String,
    /// deleteSource or updateSourceWithDestination.
    pub strategy: Option<String>,
}

impl PostmanTool for MergeCollectionForkTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let source = path_id("source", &self.source)?;
        let destination = path_id("destination", &self.destination)?;
        let strategy = one_of("strategy", self.strategy, &MERGE_STRATEGIES)?;
        Ok(ToolRequest::post("/collections/merge").with_body(object([
            ("source", Some(Value::from(source))),
            ("destination", Some(Value::from(destination))),
            ("strategy", strategy.map(Value::from)),
        ])))
    }
}

#[macros::mcp_tool(
    name = "pull_collection_changes",
    description = "Pull changes from the parent collection into a forked collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct PullCollectionChangesTool {
    /// ID of the forked collection.
    pub collection_id: String,
}

impl PostmanTool for PullCollectionChangesTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        Ok(ToolRequest::put(format!("/collections/{collection_id}/pulls")))
    }
}
