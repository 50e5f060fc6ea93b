//! Login URL tool for MCP operations

use crate::error::SessionError;
use crate::mcp::schema::ToolSchema;
use crate::mcp::tool_registry::{McpTool, ToolContext};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Tool returning the Kite login URL
#[derive(Default)]
pub struct GetAuthorizeTool;

impl GetAuthorizeTool {
    /// Creates a new instance of the GetAuthorizeTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetAuthorizeTool {
    fn name(&self) -> &'static str {
        "GetAuthorize"
    }

    fn title(&self) -> &'static str {
        "Get Kite Authorization URL"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::empty()
    }

    fn failure_message(&self) -> &'static str {
        "Error generating login URL"
    }

    async fn execute(
        &self,
        _arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<String, SessionError> {
        let url = context.session_client.authorize_url().await?;
        Ok(format!("Visit the following URL to authorize: {url}"))
    }
}
