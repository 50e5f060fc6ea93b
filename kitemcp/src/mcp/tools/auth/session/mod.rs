//! Session generation tool for MCP operations

use crate::error::SessionError;
use crate::mcp::schema::{FieldRule, ToolSchema};
use crate::mcp::tool_registry::{BaseToolImpl, McpTool, ToolContext};
use crate::mcp::types::GenerateSessionRequest;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Minimum length of a Kite request token
pub const MIN_REQUEST_TOKEN_LENGTH: usize = 10;

/// Tool exchanging a request token for an access token
#[derive(Default)]
pub struct GetSessionTool;

impl GetSessionTool {
    /// Creates a new instance of the GetSessionTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for GetSessionTool {
    fn name(&self) -> &'static str {
        "GetSession"
    }

    fn title(&self) -> &'static str {
        "Generate Kite Session"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::empty().field(
            FieldRule::string("requestoken", "Request token from the Kite login redirect")
                .min_length(MIN_REQUEST_TOKEN_LENGTH)
                .message("Request token is required"),
        )
    }

    fn failure_message(&self) -> &'static str {
        "Error generating session"
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<String, SessionError> {
        let request: GenerateSessionRequest = BaseToolImpl::parse_arguments(arguments)?;
        let access_token = context
            .session_client
            .generate_session(&request.requestoken)
            .await?;
        Ok(format!("Session generated. Access Token: {access_token}"))
    }
}
