//! Response creation utilities for MCP operations
//!
//! Every tool call resolves to a single text content entry. Success and failure
//! texts start with different markers so a reader can tell them apart without
//! looking at the `is_error` flag.

use rmcp::model::*;

/// Prefix of every success message
pub const SUCCESS_MARKER: &str = "✅";

/// Prefix of every failure message
pub const FAILURE_MARKER: &str = "❌";

/// Create a success response for MCP tool calls
pub fn create_success_response(message: impl AsRef<str>) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent {
                text: format!("{SUCCESS_MARKER} {}", message.as_ref()),
            }),
            None,
        )],
        is_error: Some(false),
    }
}

/// Create an error response for MCP tool calls
pub fn create_error_response(message: impl AsRef<str>) -> CallToolResult {
    CallToolResult {
        content: vec![Annotated::new(
            RawContent::Text(RawTextContent {
                text: format!("{FAILURE_MARKER} {}", message.as_ref()),
            }),
            None,
        )],
        is_error: Some(true),
    }
}

/// Text of the first content entry, if it is text
pub fn response_text(result: &CallToolResult) -> Option<&str> {
    result.content.first().and_then(|content| match &content.raw {
        RawContent::Text(text) => Some(text.text.as_str()),
        _ => None,
    })
}
