//! Brokerage API clients
//!
//! [`BrokerClient`] is the seam between the session client and the outside world.
//! [`kite::KiteConnectClient`] talks to the Kite Connect REST API and
//! [`mock::MockBrokerClient`] keeps everything in memory for tests.

pub mod kite;
pub mod mock;

use crate::error::BrokerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use kite::KiteConnectClient;
pub use mock::{MockBrokerClient, MockBrokerConfig};

/// Exchange every order is routed to
pub const EXCHANGE_NSE: &str = "NSE";

/// Cash-and-carry (delivery) product
pub const PRODUCT_CNC: &str = "CNC";

/// Market order type
pub const ORDER_TYPE_MARKET: &str = "MARKET";

/// Regular order variety
pub const VARIETY_REGULAR: &str = "regular";

/// Direction of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Buy shares
    Buy,
    /// Sell shares
    Sell,
}

impl TransactionType {
    /// Wire representation used by the Kite API
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single order submission
///
/// Serializes to the form body of `POST /orders/{variety}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    /// Order variety, part of the URL rather than the body
    #[serde(skip)]
    pub variety: String,
    /// Exchange the order is routed to
    pub exchange: String,
    /// Trading symbol, e.g. `INFY`
    pub tradingsymbol: String,
    /// Buy or sell
    pub transaction_type: TransactionType,
    /// Number of shares
    pub quantity: u64,
    /// Product type
    pub product: String,
    /// Order type
    pub order_type: String,
}

impl OrderRequest {
    /// A regular CNC market order on NSE
    pub fn market(symbol: impl Into<String>, quantity: u64, side: TransactionType) -> Self {
        Self {
            variety: VARIETY_REGULAR.to_string(),
            exchange: EXCHANGE_NSE.to_string(),
            tradingsymbol: symbol.into(),
            transaction_type: side,
            quantity,
            product: PRODUCT_CNC.to_string(),
            order_type: ORDER_TYPE_MARKET.to_string(),
        }
    }
}

/// Credentials returned by a successful request-token exchange
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenSet {
    /// Token used to authenticate subsequent API calls
    pub access_token: String,
    /// Kite user the session belongs to
    #[serde(default)]
    pub user_id: Option<String>,
    /// Token for public (websocket) endpoints
    #[serde(default)]
    pub public_token: Option<String>,
}

impl TokenSet {
    /// Token set carrying only an access token
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            user_id: None,
            public_token: None,
        }
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSet")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Profile of the logged-in user
///
/// Fields the API adds beyond the ones named here are kept in `extra` so the
/// rendered profile matches what the broker returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Kite user id, e.g. `AB1234`
    pub user_id: String,
    /// Full name
    pub user_name: String,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_shortname: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broker: Option<String>,
    /// Exchanges the user is enabled on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exchanges: Vec<String>,
    /// Products the user is enabled for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub products: Vec<String>,
    /// Order types the user is enabled for
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order_types: Vec<String>,
    #[allow(missing_docs)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Any other fields returned by the API
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProfileRecord {
    /// Profile with only the identifying fields set
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            user_shortname: None,
            email: None,
            user_type: None,
            broker: None,
            exchanges: Vec::new(),
            products: Vec::new(),
            order_types: Vec::new(),
            avatar_url: None,
            extra: serde_json::Map::new(),
        }
    }
}

/// Interface to a brokerage API
#[async_trait]
pub trait BrokerClient: Send + Sync {
    /// Login URL the user visits to obtain a request token
    async fn login_url(&self) -> Result<String, BrokerError>;

    /// Exchange a request token and the API secret for an access token
    async fn exchange_token(
        &self,
        request_token: &str,
        api_secret: &str,
    ) -> Result<TokenSet, BrokerError>;

    /// Use `access_token` for all subsequent authenticated calls
    async fn set_access_token(&self, access_token: &str);

    /// Fetch the profile of the logged-in user
    async fn profile(&self) -> Result<ProfileRecord, BrokerError>;

    /// Submit an order, returning the broker's order id
    async fn place_order(&self, order: &OrderRequest) -> Result<String, BrokerError>;
}
