//! Kite Connect REST client
//!
//! Covers the handful of endpoints the tools need: the login redirect, the
//! request-token exchange, the user profile and regular order placement.
//! Every response uses the `{status, data}` envelope; error envelopes carry
//! `message` and `error_type` instead of `data`.

use super::{BrokerClient, OrderRequest, ProfileRecord, TokenSet};
use crate::config::Config;
use crate::error::BrokerError;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use url::Url;

/// Header selecting the API version
pub const KITE_VERSION_HEADER: &str = "X-Kite-Version";

/// API version spoken by this client
pub const KITE_API_VERSION: &str = "3";

/// Lowercase hex SHA-256 of `api_key + request_token + api_secret`
pub fn session_checksum(api_key: &str, request_token: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hasher.update(request_token.as_bytes());
    hasher.update(api_secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    order_id: String,
}

/// Decode a Kite response body into its `data` payload
pub(crate) fn decode_envelope<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<T, BrokerError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            return Err(BrokerError::api(format!("HTTP {status}")));
        }
        Err(e) => return Err(BrokerError::Decode(e.to_string())),
    };

    if !status.is_success() || envelope.status.as_deref() == Some("error") {
        return Err(BrokerError::Api {
            message: envelope
                .message
                .unwrap_or_else(|| format!("HTTP {status}")),
            error_type: envelope.error_type,
        });
    }

    let data = envelope
        .data
        .ok_or_else(|| BrokerError::Decode("response carried no data".to_string()))?;
    serde_json::from_value(data).map_err(|e| BrokerError::Decode(e.to_string()))
}

/// HTTP client for the Kite Connect API
pub struct KiteConnectClient {
    http: reqwest::Client,
    api_key: String,
    api_root: Url,
    login_url: Url,
    access_token: RwLock<Option<String>>,
}

impl KiteConnectClient {
    /// Build a client for the endpoints and API key in `config`
    pub fn new(config: &Config) -> Result<Self, BrokerError> {
        let mut api_root = Url::parse(&config.api_root)?;
        // Keep a trailing slash so joins append instead of replacing the last segment
        if !api_root.path().ends_with('/') {
            let path = format!("{}/", api_root.path());
            api_root.set_path(&path);
        }

        Ok(Self {
            http: reqwest::Client::builder()
                .user_agent(concat!("kitemcp/", env!("CARGO_PKG_VERSION")))
                .build()?,
            api_key: config.api_key.clone(),
            api_root,
            login_url: Url::parse(&config.login_url)?,
            access_token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BrokerError> {
        Ok(self.api_root.join(path)?)
    }

    fn authorize_url(&self) -> Url {
        let mut url = self.login_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", &self.api_key)
            .append_pair("v", KITE_API_VERSION);
        url
    }

    fn token_request(
        &self,
        request_token: &str,
        api_secret: &str,
    ) -> Result<reqwest::RequestBuilder, BrokerError> {
        let checksum = session_checksum(&self.api_key, request_token, api_secret);
        let url = self.endpoint("session/token")?;
        Ok(self.http.post(url).form(&[
            ("api_key", self.api_key.as_str()),
            ("request_token", request_token),
            ("checksum", checksum.as_str()),
        ]))
    }

    fn order_request(
        &self,
        order: &OrderRequest,
    ) -> Result<reqwest::RequestBuilder, BrokerError> {
        let url = self.endpoint(&format!("orders/{}", order.variety))?;
        Ok(self.http.post(url).form(order))
    }

    /// Finish a request: version header, plus token auth once a session is set
    async fn build(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Request, BrokerError> {
        let mut request = request.header(KITE_VERSION_HEADER, KITE_API_VERSION);
        let token = self.access_token.read().await.clone();
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("token {}:{}", self.api_key, token));
        }
        Ok(request.build()?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, BrokerError> {
        let request = self.build(request).await?;
        let response = self.http.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }
}

#[async_trait]
impl BrokerClient for KiteConnectClient {
    async fn login_url(&self) -> Result<String, BrokerError> {
        Ok(self.authorize_url().to_string())
    }

    async fn exchange_token(
        &self,
        request_token: &str,
        api_secret: &str,
    ) -> Result<TokenSet, BrokerError> {
        tracing::debug!("Exchanging request token");
        let request = self.token_request(request_token, api_secret)?;
        self.send(request).await
    }

    async fn set_access_token(&self, access_token: &str) {
        *self.access_token.write().await = Some(access_token.to_string());
    }

    async fn profile(&self) -> Result<ProfileRecord, BrokerError> {
        let url = self.endpoint("user/profile")?;
        self.send(self.http.get(url)).await
    }

    async fn place_order(&self, order: &OrderRequest) -> Result<String, BrokerError> {
        tracing::debug!(
            "Submitting {} order for {} x {}",
            order.transaction_type,
            order.quantity,
            order.tradingsymbol
        );

        let request = self.order_request(order)?;
        let response: OrderResponse = self.send(request).await?;
        Ok(response.order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> KiteConnectClient {
        KiteConnectClient::new(&Config::new("kitekey", "kitesecret")).unwrap()
    }

    #[test]
    fn test_session_checksum_is_sha256_hex() {
        // sha256("abc")
        assert_eq!(
            session_checksum("a", "b", "c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_login_url_carries_api_key_and_version() {
        let url = client().login_url().await.unwrap();
        assert_eq!(
            url,
            "https://kite.zerodha.com/connect/login?api_key=kitekey&v=3"
        );
    }

    #[test]
    fn test_endpoint_joins_under_api_root() {
        let mut config = Config::new("k", "s");
        config.api_root = "http://localhost:8080/kite".to_string();
        let client = KiteConnectClient::new(&config).unwrap();

        assert_eq!(
            client.endpoint("orders/regular").unwrap().as_str(),
            "http://localhost:8080/kite/orders/regular"
        );
    }

    fn form_body(request: &reqwest::Request) -> &str {
        let bytes = request.body().and_then(|body| body.as_bytes()).unwrap();
        std::str::from_utf8(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_token_request_posts_checksum_form_without_auth() {
        let client = client();
        let request = client
            .build(client.token_request("abcdefghij", "kitesecret").unwrap())
            .await
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://api.kite.trade/session/token");
        assert_eq!(request.headers()[KITE_VERSION_HEADER], "3");
        assert!(request.headers().get(AUTHORIZATION).is_none());
        assert_eq!(
            form_body(&request),
            "api_key=kitekey&request_token=abcdefghij\
             &checksum=af1c05eba3011081baab6d170f26e04e7a288aedd72e6d7cabc721fb1d170d0e"
        );
    }

    #[tokio::test]
    async fn test_order_request_posts_to_variety_with_token_auth() {
        let client = client();
        client.set_access_token("tok123").await;
        let order = OrderRequest::market("INFY", 10, crate::broker::TransactionType::Buy);
        let request = client
            .build(client.order_request(&order).unwrap())
            .await
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "https://api.kite.trade/orders/regular");
        assert_eq!(request.headers()[KITE_VERSION_HEADER], "3");
        assert_eq!(request.headers()[AUTHORIZATION], "token kitekey:tok123");
        assert_eq!(
            form_body(&request),
            "exchange=NSE&tradingsymbol=INFY&transaction_type=BUY\
             &quantity=10&product=CNC&order_type=MARKET"
        );
    }

    #[tokio::test]
    async fn test_auth_header_follows_latest_token() {
        let client = client();
        let profile = || client.http.get(client.endpoint("user/profile").unwrap());

        let before = client.build(profile()).await.unwrap();
        assert!(before.headers().get(AUTHORIZATION).is_none());

        client.set_access_token("first").await;
        client.set_access_token("second").await;
        let after = client.build(profile()).await.unwrap();
        assert_eq!(after.method(), reqwest::Method::GET);
        assert_eq!(after.headers()[AUTHORIZATION], "token kitekey:second");
    }

    #[test]
    fn test_decode_success_envelope() {
        let body = r#"{"status":"success","data":{"order_id":"151220000000000"}}"#;
        let response: OrderResponse = decode_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(response.order_id, "151220000000000");
    }

    #[test]
    fn test_decode_error_envelope_uses_message() {
        let body = r#"{"status":"error","message":"Insufficient funds","error_type":"MarginException","data":null}"#;
        let err = decode_envelope::<OrderResponse>(StatusCode::BAD_REQUEST, body).unwrap_err();

        match err {
            BrokerError::Api {
                message,
                error_type,
            } => {
                assert_eq!(message, "Insufficient funds");
                assert_eq!(error_type.as_deref(), Some("MarginException"));
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_non_json_failure_reports_status() {
        let err = decode_envelope::<OrderResponse>(StatusCode::BAD_GATEWAY, "<html>").unwrap_err();
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_decode_missing_data_is_decode_error() {
        let err = decode_envelope::<OrderResponse>(StatusCode::OK, r#"{"status":"success"}"#)
            .unwrap_err();
        assert!(matches!(err, BrokerError::Decode(_)));
    }
}
