//! Request types for the Kite MCP tools
//!
//! These are deserialized from arguments that already passed schema validation.

use serde::{Deserialize, Serialize};

/// Arguments of `GetSession`
#[derive(Debug, Deserialize, Serialize)]
pub struct GenerateSessionRequest {
    /// Request token from the login redirect (the field name matches the published tool)
    pub requestoken: String,
}

/// Arguments of `BuyStock` and `SellStock`
///
/// ```ignore
/// PlaceOrderRequest {
///     stock: "INFY".to_string(),
///     qty: 10,
/// }
/// ```
#[derive(Debug, Deserialize, Serialize)]
pub struct PlaceOrderRequest {
    /// NSE trading symbol
    pub stock: String,
    /// Number of shares
    pub qty: u64,
}
