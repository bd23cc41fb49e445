//! Mock server tools

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{PostmanTool, ToolRequest};
use crate::domain::utils::{object, path_id, require_changes, Endpoint};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "get_mocks",
    description = "List mock servers, optionally filtered by team or workspace"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetMocksTool {
    pub team_id: Option<String>,
    pub workspace: Option<String>,
}

impl PostmanTool for GetMocksTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        Ok(ToolRequest::get(
            Endpoint::new("/mocks")
                .query("teamId", self.team_id)
                .query("workspace", workspace)
                .build(),
        ))
    }
}

#[macros::mcp_tool(name = "get_mock", description = "Get a mock server")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetMockTool {
    pub mock_id: String,
}

impl PostmanTool for GetMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let mock_id = path_id("mock_id", &self.mock_id)?;
        Ok(ToolRequest::get(format!("/mocks/{mock_id}")))
    }
}

#[macros::mcp_tool(
    name = "create_mock",
    description = "Create a mock server that serves the examples of a collection"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateMockTool {
    pub workspace: Option<String>,
    /// UID of the collection to mock.
    pub collection: String,
    /// UID of an environment to resolve variables with.
    pub environment: Option<String>,
    pub name: Option<String>,
    /// Require an API key to call the mock.
    pub private: Option<bool>,
}

impl PostmanTool for CreateMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        let collection = path_id("collection", &self.collection)?;
        let environment = self
            .environment
            .map(|environment| path_id("environment", &environment))
            .transpose()?;

        Ok(ToolRequest::post(
            Endpoint::new("/mocks")
                .query("workspace", workspace)
                .build(),
        )
        .with_body(json!({
            "mock": object([
                ("collection", Some(Value::from(collection))),
                ("environment", environment.map(Value::from)),
                ("name", self.name.map(Value::from)),
                ("private", self.private.map(Value::from)),
            ])
        })))
    }
}

#[macros::mcp_tool(name = "update_mock", description = "Update a mock server")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateMockTool {
    pub mock_id: String,
    pub name: Option<String>,
    pub environment: Option<String>,
    pub description: Option<String>,
    pub private: Option<bool>,
}

impl PostmanTool for UpdateMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let mock_id = path_id("mock_id", &self.mock_id)?;
        let environment = self
            .environment
            .map(|environment| path_id("environment", &environment))
            .transpose()?;
        let mock = object([
            ("name", self.name.map(Value::from)),
            ("environment", environment.map(Value::from)),
            ("description", self.description.map(Value::from)),
            ("private", self.private.map(Value::from)),
        ]);
        require_changes(&mock, "name, environment, description or private")?;

        Ok(ToolRequest::put(format!("/mocks/{mock_id}")).with_body(json!({ "mock": mock })))
    }
}

#[macros::mcp_tool(name = "delete_mock", description = "Delete a mock server")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteMockTool {
    pub mock_id: String,
}

impl PostmanTool for DeleteMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let mock_id = path_id("mock_id", &self.mock_id)?;
        Ok(ToolRequest::delete(format!("/mocks/{mock_id}")))
    }
}

#[macros::mcp_tool(
    name = "publish_mock",
    description = "Make a mock server public"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct PublishMockTool {
    pub mock_id: String,
}

impl PostmanTool for PublishMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let mock_id = path_id("mock_id", &self.mock_id)?;
        Ok(ToolRequest::post(format!("/mocks/{mock_id}/publish")))
    }
}

#[macros::mcp_tool(
    name = "unpublish_mock",
    description = "Make a public mock server private again"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UnpublishMockTool {
    pub mock_id: String,
}

impl PostmanTool for UnpublishMockTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let mock_id = path_id("mock_id", &self.mock_id)?;
        Ok(ToolRequest::delete(format!("/mocks/{mock_id}/unpublish")))
    }
}
