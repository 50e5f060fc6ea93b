//! Profile retrieval tool for MCP operations

use crate::error::SessionError;
use crate::mcp::schema::ToolSchema;
use crate::mcp::tool_registry::{McpTool, ToolContext};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Tool fetching the logged-in user's profile
#[derive(Default)]
pub struct GetProfileTool;

impl GetProfileTool {
    /// Creates a new instance of the GetProfileTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetProfileTool {
    fn name(&self) -> &'static str {
        "GetProfile"
    }

    fn title(&self) -> &'static str {
        "Get Kite Profile"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::empty()
    }

    fn failure_message(&self) -> &'static str {
        "Error fetching profile"
    }

    async fn execute(
        &self,
        _arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<String, SessionError> {
        let profile = context.session_client.profile().await?;
        let rendered = serde_json::to_string_pretty(&profile)?;
        Ok(format!(
            "Profile retrieved for {} ({})\n\n{}",
            profile.user_name, profile.user_id, rendered
        ))
    }
}
