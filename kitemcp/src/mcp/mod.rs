//! Model Context Protocol (MCP) server support
//!
//! This module exposes the brokerage operations as MCP tools: declared schemas,
//! the tool registry, response envelopes and the `rmcp` server handler.

// Module declarations
pub mod responses;
pub mod schema;
pub mod server;
pub mod tool_registry;
pub mod tools;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used items from submodules
pub use responses::{create_error_response, create_success_response, response_text};
pub use schema::{FieldKind, FieldRule, ToolSchema};
pub use server::{McpServer, ServerError, SERVER_NAME};
pub use tool_registry::{register_kite_tools, McpTool, ToolContext, ToolDefinition, ToolRegistry};
