//! Environment tools

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{PostmanTool, ToolRequest};
use crate::domain::utils::{
    json_array_payload, object, path_id, require_changes, required_text, Endpoint,
};
use crate::errors::AppError;
use crate::postman_client::ContentType;

#[macros::mcp_tool(
    name = "get_environments",
    description = "List environments, optionally restricted to a workspace"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetEnvironmentsTool {
    pub workspace: Option<String>,
}

impl PostmanTool for GetEnvironmentsTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        Ok(ToolRequest::get(
            Endpoint::new("/environments")
                .query("workspace", workspace)
                .build(),
        ))
    }
}

#[macros::mcp_tool(
    name = "get_environment",
    description = "Get an environment and its variables"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetEnvironmentTool {
    pub environment_id: String,
}

impl PostmanTool for GetEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let environment_id = path_id("environment_id", &self.environment_id)?;
        Ok(ToolRequest::get(format!("/environments/{environment_id}")))
    }
}

#[macros::mcp_tool(name = "create_environment", description = "Create an environment")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct CreateEnvironmentTool {
    pub workspace: Option<String>,
    pub name: String,
    /// JSON array of variables: `[{"key":"baseUrl","value":"https://example.com","type":"default","enabled":true}]`.
    pub values: Option<String>,
}

impl PostmanTool for CreateEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let workspace = self
            .workspace
            .map(|workspace| path_id("workspace", &workspace))
            .transpose()?;
        let name = required_text("name", &self.name)?;
        let values = self
            .values
            .map(|values| json_array_payload("values", &values))
            .transpose()?;

        Ok(ToolRequest::post(
            Endpoint::new("/environments")
                .query("workspace", workspace)
                .build(),
        )
        .with_body(json!({
            "environment": object([
                ("name", Some(Value::from(name))),
                ("values", values),
            ])
        })))
    }
}

#[macros::mcp_tool(
    name = "update_environment",
    description = "Replace the name or full variable list of an environment"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct UpdateEnvironmentTool {
    pub environment_id: String,
    pub name: Option<String>,
    /// JSON array of variables. Replaces every existing variable.
    pub values: Option<String>,
}

impl PostmanTool for UpdateEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let environment_id = path_id("environment_id", &self.environment_id)?;
        let values = self
            .values
            .map(|values| json_array_payload("values", &values))
            .transpose()?;
        let environment = object([("name", self.name.map(Value::from)), ("values", values)]);
        require_changes(&environment, "name or values")?;

        Ok(ToolRequest::put(format!("/environments/{environment_id}"))
            .with_body(json!({ "environment": environment })))
    }
}

#[macros::mcp_tool(
    name = "patch_environment",
    description = "Apply JSON Patch (RFC 6902) operations to an environment"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct PatchEnvironmentTool {
    pub environment_id: String,
    /// JSON array of operations, e.g. `[{"op":"replace","path":"/values/0/value","value":"v2"}]`.
    pub operations: String,
}

impl PostmanTool for PatchEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let environment_id = path_id("environment_id", &self.environment_id)?;
        let operations = json_array_payload("operations", &self.operations)?;
        let well_formed = operations.as_array().is_some_and(|items| {
            !items.is_empty()
                && items.iter().all(|operation| {
                    operation.get("op").and_then(Value::as_str).is_some()
                        && operation.get("path").and_then(Value::as_str).is_some()
                })
        });
        if !well_formed {
            return Err(AppError::bad_request(
                "invalid_patch",
                "operations must be a non-empty array of objects with op and path",
            ));
        }

        Ok(ToolRequest::patch(format!("/environments/{environment_id}"))
            .with_body(operations)
            .with_content_type(ContentType::JsonPatch))
    }
}

#[macros::mcp_tool(name = "delete_environment", description = "Delete an environment")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct DeleteEnvironmentTool {
    pub environment_id: String,
}

impl PostmanTool for DeleteEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let environment_id = path_id("environment_id", &self.environment_id)?;
        Ok(ToolRequest::delete(format!("/environments/{environment_id}")))
    }
}

#[macros::mcp_tool(
    name = "fork_environment",
    description = "Fork an environment into a workspace under the given fork label"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct ForkEnvironmentTool {
    pub environment_id: String,
    pub workspace: String,
    pub label: String,
}

impl PostmanTool for ForkEnvironmentTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        let environment_id = path_id("environment_id", &self.environment_id)?;
        let workspace = path_id("workspace", &self.workspace)?;
        let label = required_text("label", &self.label)?;
        Ok(ToolRequest::post(
            Endpoint::new(format!("/environments/{environment_id}/forks"))
                .query("workspace", Some(workspace))
                .build(),
        )
        .with_body(json!({ "label": label })))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::postman_client::HttpMethod;

    #[test]
    fn patch_uses_json_patch_content_type() {
        let request = PatchEnvironmentTool {
            environment_id: "e1".to_string(),
            operations: r#"[{"op":"replace","path":"/name","value":"Staging"}]"#.to_string(),
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.method, HttpMethod::Patch);
        assert_eq!(request.content_type, Some(ContentType::JsonPatch));
        assert_eq!(
            request.body,
            Some(json!([{"op": "replace", "path": "/name", "value": "Staging"}]))
        );
    }

    #[test]
    fn patch_rejects_malformed_operations() {
        for operations in ["[]", r#"[{"path":"/name"}]"#, r#"{"op":"add"}"#] {
            let result = PatchEnvironmentTool {
                environment_id: "e1".to_string(),
                operations: operations.to_string(),
            }
            .into_request();
            assert!(result.is_err(), "{operations}");
        }
    }

    #[test]
    fn create_environment_with_values() {
        let request = CreateEnvironmentTool {
            workspace: Some("w1".to_string()),
            name: "Staging".to_string(),
            values: Some(r#"[{"key":"baseUrl","value":"https://staging.example.com"}]"#.to_string()),
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.endpoint, "/environments?workspace=w1");
        assert_eq!(
            request.body,
            Some(json!({
                "environment": {
                    "name": "Staging",
                    "values": [{"key": "baseUrl", "value": "https://staging.example.com"}]
                }
            }))
        );
    }

    #[test]
    fn fork_environment_targets_forks_endpoint() {
        let request = ForkEnvironmentTool {
            environment_id: "e1".to_string(),
            workspace: "w2".to_string(),
            label: "mine".to_string(),
        }
        .into_request()
        .expect("request should build");

        assert_eq!(request.endpoint, "/environments/e1/forks?workspace=w2");
        assert_eq!(request.body, Some(json!({"label": "mine"})));
    }
}
