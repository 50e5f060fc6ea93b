//! Configuration management for kitemcp
//!
//! Settings come from `KITE_*` environment variables. The API key and secret are
//! required; everything else has a default that points at the production Kite endpoints.

use crate::common::env_loader::EnvLoader;
use crate::error::ConfigError;
use std::fmt;
use url::Url;

/// Prefix shared by all configuration variables
pub const ENV_PREFIX: &str = "KITE";

/// Default root of the Kite Connect REST API
pub const DEFAULT_API_ROOT: &str = "https://api.kite.trade";

/// Default Kite login page used to build authorize URLs
pub const DEFAULT_LOGIN_URL: &str = "https://kite.zerodha.com/connect/login";

/// Configuration settings for the Kite MCP server
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Kite Connect API key (`KITE_API_KEY`)
    pub api_key: String,
    /// Kite Connect API secret (`KITE_API_SECRET`)
    pub api_secret: String,
    /// REST API root (`KITE_API_ROOT`)
    pub api_root: String,
    /// Login page root (`KITE_LOGIN_URL`)
    pub login_url: String,
    /// Fetch the profile after every successful order (`KITE_REFRESH_PROFILE_AFTER_ORDER`)
    pub refresh_profile_after_order: bool,
}

impl Config {
    /// Create a configuration with the given credentials and default endpoints
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            api_root: DEFAULT_API_ROOT.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
            refresh_profile_after_order: true,
        }
    }

    /// Load configuration from `KITE_*` environment variables and validate it
    pub fn from_env() -> Result<Self, ConfigError> {
        let loader = EnvLoader::new(ENV_PREFIX);

        let api_key = loader
            .load_optional("API_KEY")
            .ok_or_else(|| ConfigError::Missing {
                name: loader.key("API_KEY"),
            })?;
        let api_secret = loader
            .load_optional("API_SECRET")
            .ok_or_else(|| ConfigError::Missing {
                name: loader.key("API_SECRET"),
            })?;

        let refresh_profile_after_order = match loader.load_flag("REFRESH_PROFILE_AFTER_ORDER") {
            None => true,
            Some(Ok(flag)) => flag,
            Some(Err(raw)) => {
                return Err(ConfigError::Invalid {
                    name: loader.key("REFRESH_PROFILE_AFTER_ORDER"),
                    reason: format!("'{raw}' is not a boolean"),
                })
            }
        };

        let config = Self {
            api_key,
            api_secret,
            api_root: loader.load_string("API_ROOT", DEFAULT_API_ROOT),
            login_url: loader.load_string("LOGIN_URL", DEFAULT_LOGIN_URL),
            refresh_profile_after_order,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check credentials are present and endpoints are absolute http(s) URLs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: format!("{ENV_PREFIX}_API_KEY"),
            });
        }
        if self.api_secret.trim().is_empty() {
            return Err(ConfigError::Missing {
                name: format!("{ENV_PREFIX}_API_SECRET"),
            });
        }
        Self::validate_url("API_ROOT", &self.api_root)?;
        Self::validate_url("LOGIN_URL", &self.login_url)?;
        Ok(())
    }

    fn validate_url(suffix: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::Invalid {
            name: format!("{ENV_PREFIX}_{suffix}"),
            reason,
        };
        let url = Url::parse(value).map_err(|e| invalid(format!("'{value}' is not a URL: {e}")))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }
}

// The secret stays out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("api_root", &self.api_root)
            .field("login_url", &self.login_url)
            .field(
                "refresh_profile_after_order",
                &self.refresh_profile_after_order,
            )
            .finish()
    }
}
