//! Tool registry for MCP operations
//!
//! Tools are registered once at startup under unique names. Dispatch looks a tool
//! up, validates the raw arguments against its declared [`ToolSchema`], runs the
//! handler and wraps whatever comes back into a [`CallToolResult`].

use super::responses::{create_error_response, create_success_response};
use super::schema::ToolSchema;
use crate::error::{SessionError, ToolError};
use crate::session::SessionClient;
use rmcp::model::{CallToolResult, Tool};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Context shared by all tools during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Session client running the brokerage operations
    pub session_client: Arc<SessionClient>,
}

impl ToolContext {
    /// Create a new tool context
    pub fn new(session_client: Arc<SessionClient>) -> Self {
        Self { session_client }
    }
}

/// Trait defining the interface for all MCP tools
///
/// Handlers return plain text on success and a typed [`SessionError`] on failure;
/// the registry adds the markers and the failure context.
#[async_trait::async_trait]
pub trait McpTool: Send + Sync {
    /// Get the tool's name
    fn name(&self) -> &'static str;

    /// Human readable title
    fn title(&self) -> &'static str;

    /// Get the tool's description
    fn description(&self) -> &'static str;

    /// Declared input schema
    fn schema(&self) -> ToolSchema;

    /// Context put in front of handler errors, e.g. "Error fetching profile"
    fn failure_message(&self) -> &'static str;

    /// Execute the tool with validated arguments
    async fn execute(
        &self,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> std::result::Result<String, SessionError>;
}

/// Immutable description of a registered tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    /// Unique tool name
    pub name: &'static str,
    /// Human readable title
    pub title: &'static str,
    /// Description shown to the agent host
    pub description: &'static str,
    /// Declared input schema
    pub input_schema: ToolSchema,
}

struct RegisteredTool {
    definition: ToolDefinition,
    tool: Box<dyn McpTool>,
}

/// Registry for managing MCP tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool in the registry
    ///
    /// Fails if a tool with the same name is already registered.
    pub fn register<T: McpTool + 'static>(&mut self, tool: T) -> Result<(), ToolError> {
        let name = tool.name();
        if self.tools.contains_key(name) {
            return Err(ToolError::DuplicateTool(name.to_string()));
        }

        let definition = ToolDefinition {
            name,
            title: tool.title(),
            description: tool.description(),
            input_schema: tool.schema(),
        };
        tracing::debug!("Registered tool {}", name);
        self.tools.insert(
            name.to_string(),
            RegisteredTool {
                definition,
                tool: Box::new(tool),
            },
        );
        Ok(())
    }

    /// Get a tool by name
    pub fn get_tool(&self, name: &str) -> Option<&dyn McpTool> {
        self.tools.get(name).map(|entry| entry.tool.as_ref())
    }

    /// List all registered tool names, sorted
    pub fn list_tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Definitions of all registered tools, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<ToolDefinition> = self
            .tools
            .values()
            .map(|entry| entry.definition.clone())
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(b.name));
        definitions
    }

    /// Get all registered tools as Tool objects for MCP list_tools response
    pub fn list_tools(&self) -> Vec<Tool> {
        self.definitions()
            .into_iter()
            .map(|definition| {
                let schema_map = match definition.input_schema.to_json() {
                    Value::Object(map) => map,
                    _ => Map::new(),
                };

                Tool {
                    name: definition.name.into(),
                    description: Some(definition.description.into()),
                    input_schema: Arc::new(schema_map),
                    annotations: None,
                }
            })
            .collect()
    }

    /// Validate arguments and run the named tool
    ///
    /// Handler failures are already folded into an error response; only lookup
    /// and validation problems come back as `Err`, and in that case the handler
    /// has not run.
    pub async fn invoke(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> Result<CallToolResult, ToolError> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;

        let arguments = entry.definition.input_schema.validate(&arguments)?;
        tracing::debug!("Invoking tool {}", name);

        match entry.tool.execute(arguments, context).await {
            Ok(message) => Ok(create_success_response(message)),
            Err(e) => {
                tracing::warn!("Tool {} failed: {}", name, e);
                Ok(create_error_response(format!(
                    "{}: {}",
                    entry.tool.failure_message(),
                    e
                )))
            }
        }
    }

    /// Like [`ToolRegistry::invoke`], but lookup and validation errors also become
    /// error responses
    pub async fn call(
        &self,
        name: &str,
        arguments: Map<String, Value>,
        context: &ToolContext,
    ) -> CallToolResult {
        match self.invoke(name, arguments, context).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Rejected call to {}: {}", name, e);
                create_error_response(e.to_string())
            }
        }
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Base implementation providing common utility methods for MCP tools
pub struct BaseToolImpl;

impl BaseToolImpl {
    /// Parse validated tool arguments into a typed request
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(
        arguments: Map<String, Value>,
    ) -> std::result::Result<T, SessionError> {
        serde_json::from_value(Value::Object(arguments))
            .map_err(|e| SessionError::InvalidRequest(format!("Invalid arguments: {e}")))
    }
}

/// Register every Kite tool with the registry
pub fn register_kite_tools(registry: &mut ToolRegistry) -> Result<(), ToolError> {
    use crate::mcp::tools;
    tools::auth::register_auth_tools(registry)?;
    tools::profile::register_profile_tools(registry)?;
    tools::orders::register_order_tools(registry)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broker::MockBrokerClient;
    use crate::mcp::responses::response_text;
    use crate::mcp::schema::FieldRule;
    use crate::session::{Session, SessionOptions};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock tool for testing
    struct MockTool {
        name: &'static str,
        executions: Arc<AtomicUsize>,
        fail_with: Option<&'static str>,
    }

    impl MockTool {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                executions: Arc::new(AtomicUsize::new(0)),
                fail_with: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl McpTool for MockTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn title(&self) -> &'static str {
            "Mock Tool"
        }

        fn description(&self) -> &'static str {
            "A test tool"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema::empty().field(FieldRule::integer("count", "How many").positive())
        }

        fn failure_message(&self) -> &'static str {
            "Mock tool failed"
        }

        async fn execute(
            &self,
            arguments: Map<String, Value>,
            _context: &ToolContext,
        ) -> std::result::Result<String, SessionError> {
            self.executions.fetch_add(1, Ordering::SeqCst);
            match self.fail_with {
                Some(message) => Err(SessionError::InvalidRequest(message.to_string())),
                None => Ok(format!("count was {}", arguments["count"])),
            }
        }
    }

    fn context() -> ToolContext {
        let client = SessionClient::new(
            Arc::new(MockBrokerClient::new()),
            Session::new(),
            SessionOptions {
                api_secret: "secret".to_string(),
                refresh_profile_after_order: true,
            },
        );
        ToolContext::new(Arc::new(client))
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_tool_registry_creation() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_tool_registration_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("test_tool")).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get_tool("test_tool").unwrap().name(), "test_tool");
        assert!(registry.get_tool("nonexistent").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("dup")).unwrap();

        let err = registry.register(MockTool::new("dup")).unwrap_err();
        assert!(matches!(err, ToolError::DuplicateTool(ref name) if name == "dup"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_list_tools_sorted_with_schema() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("zeta")).unwrap();
        registry.register(MockTool::new("alpha")).unwrap();

        assert_eq!(registry.list_tool_names(), vec!["alpha", "zeta"]);

        let tools = registry.list_tools();
        assert_eq!(tools[0].name, "alpha");
        assert_eq!(tools[0].input_schema["properties"]["count"]["type"], "integer");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry
            .invoke("missing", Map::new(), &context())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "missing"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_handler() {
        let tool = MockTool::new("counter");
        let executions = tool.executions.clone();
        let mut registry = ToolRegistry::new();
        registry.register(tool).unwrap();

        let err = registry
            .invoke("counter", args(serde_json::json!({"count": 0})), &context())
            .await
            .unwrap_err();

        match err {
            ToolError::Validation(e) => assert_eq!(e.field, "count"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(executions.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invoke_success_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("counter")).unwrap();

        let result = registry
            .invoke("counter", args(serde_json::json!({"count": 3})), &context())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(response_text(&result), Some("✅ count was 3"));
    }

    #[tokio::test]
    async fn test_handler_failure_becomes_error_envelope() {
        let mut tool = MockTool::new("counter");
        tool.fail_with = Some("boom");
        let mut registry = ToolRegistry::new();
        registry.register(tool).unwrap();

        let result = registry
            .invoke("counter", args(serde_json::json!({"count": 3})), &context())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            response_text(&result),
            Some("❌ Mock tool failed: Invalid request: boom")
        );
    }

    #[tokio::test]
    async fn test_call_folds_registry_errors_into_envelope() {
        let mut registry = ToolRegistry::new();
        registry.register(MockTool::new("counter")).unwrap();

        let unknown = registry.call("missing", Map::new(), &context()).await;
        assert_eq!(response_text(&unknown), Some("❌ Unknown tool: missing"));

        let invalid = registry.call("counter", Map::new(), &context()).await;
        assert_eq!(invalid.is_error, Some(true));
        assert_eq!(
            response_text(&invalid),
            Some("❌ Invalid argument 'count': is required")
        );
    }

    #[test]
    fn test_base_tool_impl_parse_arguments() {
        #[derive(serde::Deserialize)]
        struct TestArgs {
            name: String,
        }

        let parsed: TestArgs =
            BaseToolImpl::parse_arguments(args(serde_json::json!({"name": "test"}))).unwrap();
        assert_eq!(parsed.name, "test");

        let err = BaseToolImpl::parse_arguments::<TestArgs>(Map::new()).err().unwrap();
        assert!(matches!(err, SessionError::InvalidRequest(_)));
    }

    #[test]
    fn test_register_kite_tools() {
        let mut registry = ToolRegistry::new();
        register_kite_tools(&mut registry).unwrap();

        assert_eq!(
            registry.list_tool_names(),
            vec!["BuyStock", "GetAuthorize", "GetProfile", "GetSession", "SellStock"]
        );
        assert!(register_kite_tools(&mut registry).is_err());
    }
}
