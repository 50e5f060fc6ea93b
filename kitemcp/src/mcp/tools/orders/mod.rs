//! Order placement tools for MCP operations
//!
//! `BuyStock` and `SellStock` take the same arguments and differ only in the
//! transaction type, so both delegate to [`place_market_order`]. Orders are
//! always regular CNC market orders on NSE.

pub mod buy;
pub mod sell;

use crate::broker::TransactionType;
use crate::error::{SessionError, ToolError};
use crate::mcp::schema::{FieldRule, ToolSchema};
use crate::mcp::tool_registry::{BaseToolImpl, ToolContext, ToolRegistry};
use crate::mcp::types::PlaceOrderRequest;
use serde_json::{Map, Value};

/// Register all order tools with the registry
pub fn register_order_tools(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    registry.register(buy::BuyStockTool::new())?;
    registry.register(sell::SellStockTool::new())?;
    Ok(())
}

/// Input schema shared by the order tools
pub(crate) fn order_schema() -> ToolSchema {
    ToolSchema::empty()
        .field(
            FieldRule::string("stock", "NSE trading symbol, e.g. INFY")
                .min_length(1)
                .message("Stock symbol required"),
        )
        .field(
            FieldRule::integer("qty", "Number of shares")
                .positive()
                .message("Quantity must be a positive integer"),
        )
}

/// Place the order described by `arguments` and describe the outcome
pub(crate) async fn place_market_order(
    side: TransactionType,
    arguments: Map<String, Value>,
    context: &ToolContext,
) -> Result<String, SessionError> {
    let request: PlaceOrderRequest = BaseToolImpl::parse_arguments(arguments)?;
    let order_id = context
        .session_client
        .place_order(&request.stock, request.qty, side)
        .await?;

    let label = match side {
        TransactionType::Buy => "Buy",
        TransactionType::Sell => "Sell",
    };
    Ok(format!(
        "{label} order placed for {} share(s) of {}\nOrder ID: {order_id}",
        request.qty, request.stock
    ))
}
