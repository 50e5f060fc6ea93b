//! # kitemcp
//!
//! Zerodha Kite Connect brokerage operations exposed as Model Context Protocol tools.
//!
//! ## Features
//!
//! - **Tools**: `GetAuthorize`, `GetSession`, `GetProfile`, `BuyStock` and `SellStock`
//! - **Schema validation**: arguments are checked field by field before any broker call
//! - **Explicit session**: the access token lives in a [`Session`] handle owned by the caller
//! - **Pluggable broker**: [`broker::KiteConnectClient`] for the real API,
//!   [`broker::MockBrokerClient`] for tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kitemcp::{Config, McpServer};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let server = McpServer::from_config(&config)?;
//!
//! let response = server.call_tool_by_name("GetAuthorize", None).await;
//! println!("{:?}", kitemcp::mcp::response_text(&response));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

/// Brokerage API clients
pub mod broker;

/// Shared utilities
pub mod common;

/// Configuration loading
pub mod config;

/// Error types
pub mod error;

/// Model Context Protocol (MCP) server support
pub mod mcp;

/// Brokerage session client
pub mod session;

// Re-export core types
pub use broker::{BrokerClient, OrderRequest, ProfileRecord, TransactionType};
pub use config::Config;
pub use error::{BrokerError, ConfigError, Result, SessionError, ToolError, ValidationError};
pub use mcp::McpServer;
pub use session::{Session, SessionClient, SessionOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
