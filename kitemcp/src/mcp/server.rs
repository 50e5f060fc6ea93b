//! MCP server implementation for serving Kite tools

use crate::broker::{BrokerClient, KiteConnectClient};
use crate::config::Config;
use crate::error::{BrokerError, ToolError};
use crate::session::{Session, SessionClient, SessionOptions};
use rmcp::model::*;
use rmcp::service::RequestContext;
use rmcp::{Error as McpError, RoleServer, ServerHandler};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use super::tool_registry::{register_kite_tools, ToolContext, ToolDefinition, ToolRegistry};

/// Name the server reports to MCP clients
pub const SERVER_NAME: &str = "kite-trading-server";

const INSTRUCTIONS: &str = "Trade on Zerodha Kite. Call GetAuthorize and open the URL to log in, \
then pass the request_token from the redirect to GetSession. After that, GetProfile, BuyStock \
and SellStock are available. Orders are CNC market orders on NSE.";

/// Errors that can occur while building the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The brokerage client could not be created
    #[error("Failed to create Kite client: {0}")]
    Broker(#[from] BrokerError),

    /// Tool registration failed
    #[error("Failed to register tools: {0}")]
    Registry(#[from] ToolError),
}

/// MCP server exposing the Kite tools
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
    /// Tool context containing shared state for tool execution
    pub tool_context: Arc<ToolContext>,
}

impl McpServer {
    /// Create a server whose tools run on `session_client`
    ///
    /// # Errors
    ///
    /// Returns an error if two tools are registered under the same name.
    pub fn new(session_client: Arc<SessionClient>) -> Result<Self, ToolError> {
        let mut tool_registry = ToolRegistry::new();
        register_kite_tools(&mut tool_registry)?;
        tracing::debug!("Registered {} tools", tool_registry.len());

        Ok(Self {
            tool_registry: Arc::new(tool_registry),
            tool_context: Arc::new(ToolContext::new(session_client)),
        })
    }

    /// Create a server talking to `broker` with a fresh session
    pub fn with_broker(
        broker: Arc<dyn BrokerClient>,
        options: SessionOptions,
    ) -> Result<Self, ToolError> {
        let session_client = SessionClient::new(broker, Session::new(), options);
        Self::new(Arc::new(session_client))
    }

    /// Create a server talking to the Kite Connect API described by `config`
    pub fn from_config(config: &Config) -> Result<Self, ServerError> {
        let broker = KiteConnectClient::new(config)?;
        Ok(Self::with_broker(Arc::new(broker), config.into())?)
    }

    /// Names of all registered tools, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        self.tool_registry.list_tool_names()
    }

    /// Definitions of all registered tools, sorted by name
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_registry.definitions()
    }

    /// Run a tool by name; always resolves to a response envelope
    pub async fn call_tool_by_name(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> CallToolResult {
        self.tool_registry
            .call(name, arguments.unwrap_or_default(), &self.tool_context)
            .await
    }
}

impl ServerHandler for McpServer {
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        tracing::info!("Tool call: {}", request.name);
        Ok(self
            .call_tool_by_name(&request.name, request.arguments)
            .await)
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities {
                prompts: None,
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
                resources: None,
                logging: None,
                completions: None,
                experimental: None,
            },
            server_info: Implementation {
                name: SERVER_NAME.into(),
                version: crate::VERSION.into(),
            },
            instructions: Some(INSTRUCTIONS.into()),
        }
    }
}
