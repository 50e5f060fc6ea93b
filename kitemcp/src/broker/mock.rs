//! In-memory broker client for testing
//!
//! `MockBrokerClient` answers every [`BrokerClient`] call from a
//! [`MockBrokerConfig`] and counts how often each operation was invoked, so tests
//! can assert both on results and on which upstream calls happened.
//!
//! ```ignore
//! use kitemcp::broker::{MockBrokerClient, OrderRequest, TransactionType, BrokerClient};
//!
//! let broker = MockBrokerClient::new().with_order_id("ORD1");
//! let id = broker.place_order(&OrderRequest::market("INFY", 1, TransactionType::Buy)).await?;
//! assert_eq!(id, "ORD1");
//! assert_eq!(broker.order_calls(), 1);
//! ```

use super::{BrokerClient, OrderRequest, ProfileRecord, TokenSet};
use crate::error::BrokerError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Canned responses and simulated failures for [`MockBrokerClient`]
#[derive(Debug, Clone)]
pub struct MockBrokerConfig {
    /// URL returned by `login_url`
    pub login_url: String,
    /// Access token returned by `exchange_token`
    pub access_token: String,
    /// Profile returned by `profile`
    pub profile: ProfileRecord,
    /// Order id returned by `place_order`
    pub order_id: String,
    /// Fail `login_url` with this message
    pub fail_login_url: Option<String>,
    /// Fail `exchange_token` with this message
    pub fail_exchange: Option<String>,
    /// Fail `profile` with this message
    pub fail_profile: Option<String>,
    /// Fail `place_order` with this message
    pub fail_order: Option<String>,
}

impl Default for MockBrokerConfig {
    fn default() -> Self {
        Self {
            login_url: "https://kite.zerodha.com/connect/login?api_key=mock_key&v=3".to_string(),
            access_token: "mock_access_token".to_string(),
            profile: ProfileRecord::new("AB1234", "Mock User"),
            order_id: "mock_order_id".to_string(),
            fail_login_url: None,
            fail_exchange: None,
            fail_profile: None,
            fail_order: None,
        }
    }
}

#[derive(Debug, Default)]
struct CallCounts {
    login_url: AtomicUsize,
    exchange: AtomicUsize,
    set_token: AtomicUsize,
    profile: AtomicUsize,
    order: AtomicUsize,
}

#[derive(Debug, Default)]
struct Recorded {
    request_token: Option<String>,
    api_secret: Option<String>,
    access_token: Option<String>,
    last_order: Option<OrderRequest>,
}

/// Mock broker client with call counting
#[derive(Debug, Clone, Default)]
pub struct MockBrokerClient {
    config: Arc<RwLock<MockBrokerConfig>>,
    calls: Arc<CallCounts>,
    recorded: Arc<RwLock<Recorded>>,
}

impl MockBrokerClient {
    /// Create a mock with default responses and no failures
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with a custom configuration
    pub fn new_with_config(config: MockBrokerConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            ..Self::default()
        }
    }

    fn update(self, f: impl FnOnce(&mut MockBrokerConfig)) -> Self {
        // Builders run before the mock is shared, so the lock is uncontended.
        if let Ok(mut config) = self.config.try_write() {
            f(&mut config);
        }
        self
    }

    /// Return `token` from `exchange_token`
    pub fn with_access_token(self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.update(|c| c.access_token = token)
    }

    /// Return `order_id` from `place_order`
    pub fn with_order_id(self, order_id: impl Into<String>) -> Self {
        let order_id = order_id.into();
        self.update(|c| c.order_id = order_id)
    }

    /// Return `profile` from `profile`
    pub fn with_profile(self, profile: ProfileRecord) -> Self {
        self.update(|c| c.profile = profile)
    }

    /// Return `url` from `login_url`
    pub fn with_login_url(self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|c| c.login_url = url)
    }

    /// Replace the configuration, e.g. to start failing midway through a test
    pub async fn set_config(&self, config: MockBrokerConfig) {
        *self.config.write().await = config;
    }

    /// Current configuration
    pub async fn config(&self) -> MockBrokerConfig {
        self.config.read().await.clone()
    }

    /// Number of `login_url` calls
    pub fn login_url_calls(&self) -> usize {
        self.calls.login_url.load(Ordering::SeqCst)
    }

    /// Number of `exchange_token` calls
    pub fn exchange_calls(&self) -> usize {
        self.calls.exchange.load(Ordering::SeqCst)
    }

    /// Number of `set_access_token` calls
    pub fn set_token_calls(&self) -> usize {
        self.calls.set_token.load(Ordering::SeqCst)
    }

    /// Number of `profile` calls
    pub fn profile_calls(&self) -> usize {
        self.calls.profile.load(Ordering::SeqCst)
    }

    /// Number of `place_order` calls
    pub fn order_calls(&self) -> usize {
        self.calls.order.load(Ordering::SeqCst)
    }

    /// Total calls across all operations
    pub fn total_calls(&self) -> usize {
        self.login_url_calls()
            + self.exchange_calls()
            + self.set_token_calls()
            + self.profile_calls()
            + self.order_calls()
    }

    /// Request token passed to the last `exchange_token` call
    pub async fn last_request_token(&self) -> Option<String> {
        self.recorded.read().await.request_token.clone()
    }

    /// API secret passed to the last `exchange_token` call
    pub async fn last_api_secret(&self) -> Option<String> {
        self.recorded.read().await.api_secret.clone()
    }

    /// Access token installed by the last `set_access_token` call
    pub async fn installed_access_token(&self) -> Option<String> {
        self.recorded.read().await.access_token.clone()
    }

    /// Order passed to the last `place_order` call
    pub async fn last_order(&self) -> Option<OrderRequest> {
        self.recorded.read().await.last_order.clone()
    }
}

#[async_trait]
impl BrokerClient for MockBrokerClient {
    async fn login_url(&self) -> Result<String, BrokerError> {
        self.calls.login_url.fetch_add(1, Ordering::SeqCst);
        let config = self.config.read().await;
        match &config.fail_login_url {
            Some(message) => Err(BrokerError::api(message.clone())),
            None => Ok(config.login_url.clone()),
        }
    }

    async fn exchange_token(
        &self,
        request_token: &str,
        api_secret: &str,
    ) -> Result<TokenSet, BrokerError> {
        self.calls.exchange.fetch_add(1, Ordering::SeqCst);
        {
            let mut recorded = self.recorded.write().await;
            recorded.request_token = Some(request_token.to_string());
            recorded.api_secret = Some(api_secret.to_string());
        }

        let config = self.config.read().await;
        match &config.fail_exchange {
            Some(message) => Err(BrokerError::api(message.clone())),
            None => Ok(TokenSet::new(config.access_token.clone())),
        }
    }

    async fn set_access_token(&self, access_token: &str) {
        self.calls.set_token.fetch_add(1, Ordering::SeqCst);
        self.recorded.write().await.access_token = Some(access_token.to_string());
    }

    async fn profile(&self) -> Result<ProfileRecord, BrokerError> {
        self.calls.profile.fetch_add(1, Ordering::SeqCst);
        let config = self.config.read().await;
        match &config.fail_profile {
            Some(message) => Err(BrokerError::api(message.clone())),
            None => Ok(config.profile.clone()),
        }
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<String, BrokerError> {
        self.calls.order.fetch_add(1, Ordering::SeqCst);
        self.recorded.write().await.last_order = Some(order.clone());

        let config = self.config.read().await;
        match &config.fail_order {
            Some(message) => Err(BrokerError::api(message.clone())),
            None => Ok(config.order_id.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::TransactionType;

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let broker = MockBrokerClient::new().with_order_id("ORD9");
        assert_eq!(broker.total_calls(), 0);

        let order = OrderRequest::market("INFY", 3, TransactionType::Buy);
        assert_eq!(broker.place_order(&order).await.unwrap(), "ORD9");
        broker.profile().await.unwrap();

        assert_eq!(broker.order_calls(), 1);
        assert_eq!(broker.profile_calls(), 1);
        assert_eq!(broker.last_order().await, Some(order));
    }

    #[tokio::test]
    async fn test_mock_failures_are_configurable() {
        let broker = MockBrokerClient::new();
        let mut config = broker.config().await;
        config.fail_exchange = Some("Token is invalid or has expired.".to_string());
        broker.set_config(config).await;

        let err = broker.exchange_token("request_tok", "secret").await.unwrap_err();
        assert_eq!(err.to_string(), "Token is invalid or has expired.");
        assert_eq!(broker.last_request_token().await.as_deref(), Some("request_tok"));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let broker = MockBrokerClient::new();
        let handle = broker.clone();

        broker.set_access_token("tok").await;
        assert_eq!(handle.set_token_calls(), 1);
        assert_eq!(handle.installed_access_token().await.as_deref(), Some("tok"));
    }
}
