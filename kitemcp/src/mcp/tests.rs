//! Tests for MCP server functionality

use super::responses::response_text;
use super::server::{McpServer, SERVER_NAME};
use crate::broker::MockBrokerClient;
use crate::config::Config;
use crate::session::SessionOptions;
use rmcp::ServerHandler;
use std::sync::Arc;

fn server_with(broker: &MockBrokerClient) -> McpServer {
    McpServer::with_broker(
        Arc::new(broker.clone()),
        SessionOptions {
            api_secret: "secret".to_string(),
            refresh_profile_after_order: true,
        },
    )
    .unwrap()
}

#[test]
fn test_mcp_server_info() {
    let server = server_with(&MockBrokerClient::new());
    let info = server.get_info();

    assert_eq!(info.server_info.name, SERVER_NAME);
    assert_eq!(info.server_info.version, crate::VERSION);
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.prompts.is_none());
    assert!(info.instructions.unwrap().contains("GetAuthorize"));
}

#[test]
fn test_mcp_server_exposes_all_tools() {
    let server = server_with(&MockBrokerClient::new());
    assert_eq!(
        server.list_tool_names(),
        vec!["BuyStock", "GetAuthorize", "GetProfile", "GetSession", "SellStock"]
    );

    let definitions = server.tool_definitions();
    let session = definitions.iter().find(|d| d.name == "GetSession").unwrap();
    assert_eq!(session.title, "Generate Kite Session");
    assert_eq!(
        session.input_schema.to_json()["properties"]["requestoken"]["minLength"],
        10
    );
}

#[test]
fn test_server_from_config_builds_kite_client() {
    let server = McpServer::from_config(&Config::new("key", "secret")).unwrap();
    assert_eq!(server.list_tool_names().len(), 5);
}

#[tokio::test]
async fn test_call_tool_by_name_without_arguments() {
    let broker = MockBrokerClient::new().with_login_url("https://example.test/login?api_key=k&v=3");
    let server = server_with(&broker);

    let response = server.call_tool_by_name("GetAuthorize", None).await;
    assert_eq!(
        response_text(&response),
        Some("✅ Visit the following URL to authorize: https://example.test/login?api_key=k&v=3")
    );
    assert_eq!(broker.login_url_calls(), 1);
}

#[tokio::test]
async fn test_unknown_tool_resolves_to_envelope() {
    let broker = MockBrokerClient::new();
    let server = server_with(&broker);

    let response = server.call_tool_by_name("add", None).await;
    assert_eq!(response.is_error, Some(true));
    assert_eq!(response.content.len(), 1);
    assert_eq!(response_text(&response), Some("❌ Unknown tool: add"));
    assert_eq!(broker.total_calls(), 0);
}

#[tokio::test]
async fn test_server_clones_share_session() {
    let broker = MockBrokerClient::new().with_access_token("tok123");
    let server = server_with(&broker);
    let clone = server.clone();

    let mut args = serde_json::Map::new();
    args.insert("requestoken".into(), "abcdefghij".into());
    server.call_tool_by_name("GetSession", Some(args)).await;

    let session = clone.tool_context.session_client.session();
    assert_eq!(session.access_token().await.as_deref(), Some("tok123"));
}
