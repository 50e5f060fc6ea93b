//! Profile tools for MCP operations

pub mod get;

use crate::error::ToolError;
use crate::mcp::tool_registry::ToolRegistry;

/// Register all profile tools with the registry
pub fn register_profile_tools(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register(get::GetProfileTool::new())
}
