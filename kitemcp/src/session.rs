//! Brokerage session client
//!
//! A [`Session`] is the single access-token slot of a running server. It is created
//! by the composition root and handed to a [`SessionClient`], which is the only
//! thing allowed to fill it. The slot starts empty and is filled by a successful
//! [`SessionClient::generate_session`]; there is no way back to the empty state.

use crate::broker::{BrokerClient, OrderRequest, ProfileRecord, TransactionType};
use crate::config::Config;
use crate::error::{Result, SessionError};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared handle to the access-token slot
///
/// Clones refer to the same slot.
#[derive(Debug, Clone, Default)]
pub struct Session {
    access_token: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Create an unauthenticated session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current access token, if a session has been generated
    pub async fn access_token(&self) -> Option<String> {
        self.access_token.read().await.clone()
    }

    /// Whether a session has been generated
    pub async fn is_authenticated(&self) -> bool {
        self.access_token.read().await.is_some()
    }
}

/// Options controlling session client behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// API secret sent with the request-token exchange
    pub api_secret: String,
    /// Fetch the profile after every successful order
    pub refresh_profile_after_order: bool,
}

impl From<&Config> for SessionOptions {
    fn from(config: &Config) -> Self {
        Self {
            api_secret: config.api_secret.clone(),
            refresh_profile_after_order: config.refresh_profile_after_order,
        }
    }
}

/// Runs the brokerage operations against a [`BrokerClient`] and a [`Session`]
pub struct SessionClient {
    broker: Arc<dyn BrokerClient>,
    session: Session,
    options: SessionOptions,
}

impl SessionClient {
    /// Create a session client over `broker`, filling `session` on login
    pub fn new(broker: Arc<dyn BrokerClient>, session: Session, options: SessionOptions) -> Self {
        Self {
            broker,
            session,
            options,
        }
    }

    /// The session this client fills
    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn require_session(&self) -> Result<()> {
        if self.session.is_authenticated().await {
            Ok(())
        } else {
            Err(SessionError::NotAuthenticated)
        }
    }

    /// Login URL the user visits to obtain a request token
    pub async fn authorize_url(&self) -> Result<String> {
        let url = self.broker.login_url().await.map_err(|e| {
            tracing::error!("Failed to build login URL: {}", e);
            SessionError::from(e)
        })?;
        tracing::debug!("Login URL: {}", url);
        Ok(url)
    }

    /// Exchange `request_token` for an access token and start the session
    ///
    /// The token is stored and installed on the broker client under the session
    /// write lock, so concurrent calls leave slot and client agreeing on the last
    /// token written. A failed exchange leaves the session untouched.
    pub async fn generate_session(&self, request_token: &str) -> Result<String> {
        if request_token.is_empty() {
            return Err(SessionError::InvalidRequest(
                "request token must not be empty".to_string(),
            ));
        }

        let tokens = self
            .broker
            .exchange_token(request_token, &self.options.api_secret)
            .await
            .map_err(|e| {
                tracing::error!("Failed to generate session: {}", e);
                SessionError::from(e)
            })?;

        let mut slot = self.session.access_token.write().await;
        self.broker.set_access_token(&tokens.access_token).await;
        *slot = Some(tokens.access_token.clone());
        drop(slot);

        match &tokens.user_id {
            Some(user_id) => tracing::info!("Session generated for {}", user_id),
            None => tracing::info!("Session generated"),
        }
        Ok(tokens.access_token)
    }

    /// Profile of the logged-in user
    pub async fn profile(&self) -> Result<ProfileRecord> {
        self.require_session().await?;
        let profile = self.broker.profile().await.map_err(|e| {
            tracing::error!("Failed to fetch profile: {}", e);
            SessionError::from(e)
        })?;
        tracing::debug!("Fetched profile for {}", profile.user_id);
        Ok(profile)
    }

    /// Place a regular CNC market order on NSE, returning the order id
    ///
    /// After a successful order the profile is fetched once more (unless disabled
    /// in [`SessionOptions`]). That fetch never changes the outcome: its failure is
    /// logged and the order id is still returned.
    pub async fn place_order(
        &self,
        symbol: &str,
        quantity: u64,
        side: TransactionType,
    ) -> Result<String> {
        self.require_session().await?;

        let order = OrderRequest::market(symbol, quantity, side);
        let order_id = self.broker.place_order(&order).await.map_err(|e| {
            tracing::error!("Failed to place {} order for {}: {}", side, symbol, e);
            SessionError::from(e)
        })?;
        tracing::info!(
            "Placed {} order {} for {} x {}",
            side,
            order_id,
            quantity,
            symbol
        );

        if self.options.refresh_profile_after_order {
            match self.broker.profile().await {
                Ok(profile) => tracing::debug!("Refreshed profile for {}", profile.user_id),
                Err(e) => tracing::warn!("Profile refresh after order {} failed: {}", order_id, e),
            }
        }

        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::{MockBrokerClient, MockBrokerConfig};

    fn options(refresh: bool) -> SessionOptions {
        SessionOptions {
            api_secret: "secret".to_string(),
            refresh_profile_after_order: refresh,
        }
    }

    fn client_with(broker: &MockBrokerClient, refresh: bool) -> SessionClient {
        SessionClient::new(Arc::new(broker.clone()), Session::new(), options(refresh))
    }

    #[tokio::test]
    async fn test_session_starts_unauthenticated() {
        let session = Session::new();
        assert!(!session.is_authenticated().await);
        assert_eq!(session.access_token().await, None);
    }

    #[tokio::test]
    async fn test_generate_session_stores_and_installs_token() {
        let broker = MockBrokerClient::new().with_access_token("tok123");
        let client = client_with(&broker, true);

        let token = client.generate_session("abcdefghij").await.unwrap();

        assert_eq!(token, "tok123");
        assert_eq!(client.session().access_token().await.as_deref(), Some("tok123"));
        assert_eq!(broker.installed_access_token().await.as_deref(), Some("tok123"));
        assert_eq!(broker.last_api_secret().await.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_failed_exchange_leaves_session_unset() {
        let broker = MockBrokerClient::new_with_config(MockBrokerConfig {
            fail_exchange: Some("Invalid checksum".to_string()),
            ..MockBrokerConfig::default()
        });
        let client = client_with(&broker, true);

        let err = client.generate_session("abcdefghij").await.unwrap_err();

        assert!(matches!(err, SessionError::Upstream(_)));
        assert!(!client.session().is_authenticated().await);
        assert_eq!(broker.set_token_calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_request_token_never_reaches_broker() {
        let broker = MockBrokerClient::new();
        let client = client_with(&broker, true);

        let err = client.generate_session("").await.unwrap_err();
        assert!(matches!(err, SessionError::InvalidRequest(_)));
        assert_eq!(broker.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_request_token_is_left_to_the_broker() {
        let broker = MockBrokerClient::new().with_access_token("tok123");
        let client = client_with(&broker, true);

        client.generate_session("          ").await.unwrap();
        assert_eq!(broker.exchange_calls(), 1);
        assert!(client.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_authenticated_operations_require_session() {
        let broker = MockBrokerClient::new();
        let client = client_with(&broker, true);

        assert!(matches!(
            client.profile().await,
            Err(SessionError::NotAuthenticated)
        ));
        assert!(matches!(
            client.place_order("INFY", 1, TransactionType::Sell).await,
            Err(SessionError::NotAuthenticated)
        ));
        assert!(matches!(
            client.place_order("", 0, TransactionType::Buy).await,
            Err(SessionError::NotAuthenticated)
        ));
        assert_eq!(broker.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_order_refreshes_profile_once() {
        let broker = MockBrokerClient::new().with_order_id("ORD1");
        let client = client_with(&broker, true);
        client.generate_session("abcdefghij").await.unwrap();

        let id = client
            .place_order("INFY", 10, TransactionType::Buy)
            .await
            .unwrap();

        assert_eq!(id, "ORD1");
        assert_eq!(broker.order_calls(), 1);
        assert_eq!(broker.profile_calls(), 1);
        let order = broker.last_order().await.unwrap();
        assert_eq!(order, OrderRequest::market("INFY", 10, TransactionType::Buy));
    }

    #[tokio::test]
    async fn test_profile_refresh_can_be_disabled() {
        let broker = MockBrokerClient::new();
        let client = client_with(&broker, false);
        client.generate_session("abcdefghij").await.unwrap();

        client
            .place_order("INFY", 1, TransactionType::Buy)
            .await
            .unwrap();
        assert_eq!(broker.profile_calls(), 0);
    }

    #[tokio::test]
    async fn test_profile_refresh_failure_keeps_order_success() {
        let broker = MockBrokerClient::new_with_config(MockBrokerConfig {
            order_id: "ORD2".to_string(),
            fail_profile: Some("Gateway timed out".to_string()),
            ..MockBrokerConfig::default()
        });
        let client = client_with(&broker, true);
        client.generate_session("abcdefghij").await.unwrap();

        let id = client
            .place_order("TCS", 5, TransactionType::Sell)
            .await
            .unwrap();
        assert_eq!(id, "ORD2");
        assert_eq!(broker.profile_calls(), 1);
    }

    #[tokio::test]
    async fn test_failed_order_skips_profile_refresh() {
        let broker = MockBrokerClient::new_with_config(MockBrokerConfig {
            fail_order: Some("insufficient funds".to_string()),
            ..MockBrokerConfig::default()
        });
        let client = client_with(&broker, true);
        client.generate_session("abcdefghij").await.unwrap();

        let err = client
            .place_order("INFY", 10, TransactionType::Buy)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "insufficient funds");
        assert_eq!(broker.profile_calls(), 0);
    }

    #[tokio::test]
    async fn test_latest_session_wins() {
        let broker = MockBrokerClient::new().with_access_token("first");
        let client = client_with(&broker, true);
        client.generate_session("abcdefghij").await.unwrap();

        let mut config = broker.config().await;
        config.access_token = "second".to_string();
        broker.set_config(config).await;
        client.generate_session("klmnopqrst").await.unwrap();

        assert_eq!(client.session().access_token().await.as_deref(), Some("second"));
        assert_eq!(broker.installed_access_token().await.as_deref(), Some("second"));
    }
}
