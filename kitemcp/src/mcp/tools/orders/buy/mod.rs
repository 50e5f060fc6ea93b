//! Buy order tool for MCP operations

use super::{order_schema, place_market_order};
use crate::broker::TransactionType;
use crate::error::SessionError;
use crate::mcp::schema::ToolSchema;
use crate::mcp::tool_registry::{McpTool, ToolContext};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Tool placing a market buy order
#[derive(Default)]
pub struct BuyStockTool;

impl BuyStockTool {
    /// Creates a new instance of the BuyStockTool
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl McpTool for BuyStockTool {
    fn name(&self) -> &'static str {
        "BuyStock"
    }

    fn title(&self) -> &'static str {
        "Buy Stock"
    }

    fn description(&self) -> &'static str {
        include_str!("description.md")
    }

    fn schema(&self) -> ToolSchema {
        order_schema()
    }

    fn failure_message(&self) -> &'static str {
        "Failed to place buy order"
    }

    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<String, SessionError> {
        place_market_order(TransactionType::Buy, arguments, context).await
    }
}
