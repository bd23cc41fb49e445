//! Workspace tools

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{PostmanTool, ToolRequest};
use crate::domain::utils::{object, one_of, path_id, require_changes, required_text, Endpoint};
use crate::errors::AppError;

pub const WORKSPACE_TYPES: [&str; 5] = ["personal", "private", "public", "team", "partner"];

#[macros::mcp_tool(
    name = "get_workspaces",
    description = "List the workspaces the authenticated user can access"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetWorkspacesTool {
    /// One of: personal, private, public, team, partner.
    pub workspace_type: Option<String>,
    /// Only return workspaces created by this user ID.
    pub created_by: Option<String>,
    /// Extra data to include, e.g. `mocks:deactivated`.
    pub include: Option<String>,
}

impl PostmanTool for GetWorkspacesTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_type = one_of("workspace_type", self.workspace_type, &WORKSPACE_TYPES)?;
        Ok(ToolRequest::get(
            Endpoint::new("/workspaces")
                .query("type", workspace_type)
                .query("createdBy", self.created_by)
                .query("include", self.include)
                .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "get_workspace",
    description = "Get a workspace with its collections, environments, mocks, monitors and APIs"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetWorkspaceTool {
    pub workspace_id: String,
    pub include: Option<String>,
}

impl PostmanTool for GetWorkspaceTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_id = path_id("workspace_id", &self.workspace_id)?;
        Ok(ToolRequest::get(
            Endpoint::new(format!("/workspaces/{workspace_id}"))
                .query("include", self.include)
                .build(),
        ))
    }
}

#[macros::mcp_tool(name = "create_workspace", description = "Create a new workspace")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateWorkspaceTool {
    pub name: String,
    /// One of: personal, private, public, team, partner.
    pub workspace_type: String,
    pub description: Option<String>,
    /// Short summary shown on the workspace overview.
    pub about: Option<String>,
}

impl PostmanTool for CreateWorkspaceTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let name = required_text("name", &self.name)?;
        let workspace_type = one_of("workspace_type", Some(self.workspace_type), &WORKSPACE_TYPES)?;

        Ok(
            ToolRequest::post("/workspaces").with_body(serde_json::json!({
                "workspace": object([
                    ("name", Some(Value::from(name))),
                    ("type", workspace_type.map(Value::from)),
                    ("description", self.description.map(Value::from)),
                    ("about", self.about.map(Value::from)),
                ])
            })),
        )
    }
}

#[macros::mcp_tool(
    name = "update_workspace",
    description = "Update the name, type or description of a workspace"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateWorkspaceTool {
    pub workspace_id: String,
    pub name: Option<String>,
    pub workspace_type: Option<String>,
    pub description: Option<String>,
}

impl PostmanTool for UpdateWorkspaceTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_id = path_id("workspace_id", &self.workspace_id)?;
        let workspace_type = one_of("workspace_type", self.workspace_type, &WORKSPACE_TYPES)?;
        let workspace = object([
            ("name", self.name.map(Value::from)),
            ("type", workspace_type.map(Value::from)),
            ("description", self.description.map(Value::from)),
        ]);
        require_changes(&workspace, "name, workspace_type or description")?;

        Ok(ToolRequest::put(format!("/workspaces/{workspace_id}"))
            .with_body(serde_json::json!({ "workspace": workspace })))
    }
}

#[macros::mcp_tool(
    name = "delete_workspace",
    description = "Delete a workspace. Its elements are deleted with it"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteWorkspaceTool {
    pub workspace_id: String,
}

impl PostmanTool for DeleteWorkspaceTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace_id = path_id("workspace_id", &self.workspace_id)?;
        Ok(ToolRequest::delete(format!("/workspaces/{workspace_id}")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::postman_client::HttpMethod;

    #[test]
    fn lists_workspaces_with_filters() {
        let request = GetWorkspacesTool {
            workspace_type: Some("Team".to_string()),
            created_by: Some("12345678".to_string()),
            include: None,
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.endpoint, "/workspaces?type=team&createdBy=12345678");
        assert!(request.body.is_none());
    }

    #[test]
    fn rejects_unknown_workspace_type() {
        let error = GetWorkspacesTool {
            workspace_type: Some("galactic".to_string()),
            created_by: None,
            include: None,
        }
        .into_request()
        .expect_err("expected invalid type");
        assert!(error.to_string().contains("bad request"));
    }

    #[test]
    fn creates_workspace_body() {
        let request = CreateWorkspaceTool {
            name: " API team ".to_string(),
            workspace_type: "team".to_string(),
            description: Some("Shared APIs".to_string()),
            about: None,
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.endpoint, "/workspaces");
        assert_eq!(
            request.body,
            Some(json!({
                "workspace": {"name": "API team", "type": "team", "description": "Shared APIs"}
            }))
        );
    }

    #[test]
    fn update_requires_a_change() {
        let error = UpdateWorkspaceTool {
            workspace_id: "w1".to_string(),
            name: None,
            workspace_type: None,
            description: None,
        }
        .into_request()
        .expect_err("expected empty update");
        assert!(error.to_string().contains("at least one of"));
    }

    #[test]
    fn deletes_workspace_by_id() {
        let request = DeleteWorkspaceTool {
            workspace_id: "w1".to_string(),
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.endpoint, "/workspaces/w1");
    }
}
