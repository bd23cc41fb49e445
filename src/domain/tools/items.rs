//! Tools for requests and folders inside a collection

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PostmanTool, ToolRequest};
use crate::domain::utils::{json_object_payload, object, path_id, required_text, Endpoint};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "get_collection_request",
    description = "Get a single request from a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetCollectionRequestTool {
    pub collection_id: String,
    pub request_id: String,
    /// Return only property IDs.
    pub ids: Option<bool>,
    /// Return UIDs instead of IDs.
    pub uid: Option<bool>,
    /// Return all of the request's contents.
    pub populate: Option<bool>,
}

impl PostmanTool for GetCollectionRequestTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let request_id = path_id("request_id", &self.request_id)?;
        Ok(ToolRequest::get(
            Endpoint::new(format!(
                "/collections/{collection_id}/requests/{request_id}"
            ))
            .query("ids", self.ids)
            .query("uid", self.uid)
            .query("populate", self.populate)
            .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "create_collection_request",
    description = "Create a request in a collection, optionally inside a folder"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCollectionRequestTool {
    pub collection_id: String,
    /// Folder to create the request in. Defaults to the collection root.
    pub folder_id: Option<String>,
    /// Request JSON object, e.g. `{"name":"Get order","method":"GET","url":"https://example.com/orders/1"}`.
    pub request: String,
}

impl PostmanTool for CreateCollectionRequestTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let folder_id = self
            .folder_id
            .map(|folder_id| path_id("folder_id", &folder_id))
            .transpose()?;
        let request = json_object_payload("request", &self.request)?;

        Ok(ToolRequest::post(
            Endpoint::new(format!("/collections/{collection_id}/requests"))
                .query("folder", folder_id)
                .build(),
        )
        .with_body(request))
    }
}

#[macros::mcp_tool(
    name = "delete_collection_request",
    description = "Delete a request from a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCollectionRequestTool {
    pub collection_id: String,
    pub request_id: String,
}

impl PostmanTool for DeleteCollectionRequestTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let request_id = path_id("request_id", &self.request_id)?;
        Ok(ToolRequest::delete(format!(
            "/collections/{collection_id}/requests/{request_id}"
        )))
    }
}

#[macros::mcp_tool(
    name = "create_collection_folder",
    description = "Create a folder in a collection, optionally nested in another folder"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateCollectionFolderTool {
    pub collection_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Parent folder ID for nested folders.
    pub parent_folder_id: Option<String>,
}

impl PostmanTool for CreateCollectionFolderTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let name = required_text("name", &self.name)?;
        let parent_folder_id = self
            .parent_folder_id
            .map(|folder_id| path_id("parent_folder_id", &folder_id))
            .transpose()?;

        Ok(
            ToolRequest::post(format!("/collections/{collection_id}/folders")).with_body(
                object([
                    ("name", Some(Value::from(name))),
                    ("description", self.description.map(Value::from)),
                    ("folder", parent_folder_id.map(Value::from)),
                ]),
            ),
        )
    }
}

#[macros::mcp_tool(
    name = "delete_collection_folder",
    description = "Delete a folder and everything in it from a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteCollectionFolderTool {
    pub collection_id: String,
    pub folder_id: String,
}

impl PostmanTool for DeleteCollectionFolderTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let collection_id = path_id("collection_id", &self.collection_id)?;
        let folder_id = path_id("folder_id", &self.folder_id)?;
        Ok(ToolRequest::delete(format!(
            "/collections/{collection_id}/folders/{folder_id}"
        )))
    }
}
