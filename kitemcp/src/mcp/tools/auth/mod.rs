//! Authentication tools for MCP operations
//!
//! Logging in to Kite is a two step flow:
//!
//! 1. **GetAuthorize** returns the login URL. The user signs in there and Kite
//!    redirects back with a short lived `request_token`.
//! 2. **GetSession** exchanges that request token (plus the configured API secret)
//!    for an access token, which every other tool then uses.
//!
//! The session lasts until the process exits; there is no logout tool.

pub mod authorize;
pub mod session;

use crate::error::ToolError;
use crate::mcp::tool_registry::ToolRegistry;

/// Register all authentication tools with the registry
pub fn register_auth_tools(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register(authorize::GetAuthorizeTool::new())?;
    registry.register(session::GetSessionTool::new())?;
    Ok(())
}
