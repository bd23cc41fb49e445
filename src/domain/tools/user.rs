//! Account tools

use rust_mcp_sdk::macros;
use serde::{Deserialize, Serialize};

use super::{PostmanTool, ToolRequest};
use crate::errors::AppError;

#[macros::mcp_tool(
    name = "get_authenticated_user",
    description = "Get the user and usage limits for the configured API key"
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct GetAuthenticatedUserTool {}

impl PostmanTool for GetAuthenticatedUserTool {
    fn into_request(self) -> Result<ToolRequest, AppError> {
        Ok(ToolRequest::get("/me"))
    }
}
