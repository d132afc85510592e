//! MCP server implementation
//!
//! This module provides the MCP server that holds the Harvestr tool catalog
//! and dispatches JSON-RPC requests to it.

use crate::types::*;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Usage notes returned from `initialize`.
pub const SERVER_INSTRUCTIONS: &str = "\
This MCP server provides access to the Harvestr.io API - a product management platform \
for managing customer feedback, discoveries, and components.

Available capabilities:
- List and manage companies
- Browse components and discoveries
- Access feedback and messages
- Manage users and attributes

All tools require a valid HARVESTR_API_TOKEN environment variable.";

/// MCP server error types.
#[derive(Debug, Error)]
pub enum McpServerError {
    /// Tool not found
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Invalid parameters
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<McpServerError> for McpError {
    fn from(err: McpServerError) -> Self {
        match err {
            McpServerError::ToolNotFound(_) | McpServerError::InvalidParams(_) => {
                McpError::invalid_params(err.to_string())
            }
            McpServerError::Internal(_) => McpError::internal_error(err.to_string()),
        }
    }
}

/// Result type for MCP server operations.
pub type McpServerResult<T> = Result<T, McpServerError>;

/// Trait for tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments.
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult>;
}

/// Context for tool execution.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// JSON-RPC id of the `tools/call` request
    pub request_id: RequestId,

    /// Correlation ID for log lines belonging to one call
    pub correlation_id: String,
}

impl ToolContext {
    /// Create a context for a request, with a fresh correlation ID.
    pub fn for_request(request_id: RequestId) -> Self {
        Self {
            request_id,
            correlation_id: uuid::Uuid::now_v7().to_string(),
        }
    }

    /// Create an empty context.
    pub fn empty() -> Self {
        Self::for_request(RequestId::Null)
    }
}

/// MCP server.
///
/// Holds the registered tools and answers `initialize`, `ping`,
/// `tools/list` and `tools/call`.
pub struct McpServer {
    /// Server info
    info: ServerInfo,

    /// Server capabilities
    capabilities: ServerCapabilities,

    /// Usage notes for the connecting assistant
    instructions: Option<String>,

    /// Registered tools
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,

    /// Tool categories, in registration order
    categories: Arc<RwLock<Vec<String>>>,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolCapabilities {
                    list_changed: false,
                }),
            },
            instructions: None,
            tools: Arc::new(RwLock::new(HashMap::new())),
            categories: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create with the Harvestr server identity and instructions.
    pub fn harvestr() -> Self {
        Self::new("Harvestr MCP Server", env!("CARGO_PKG_VERSION"))
            .with_instructions(SERVER_INSTRUCTIONS)
    }

    /// Set the instructions returned from `initialize`.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    /// Register a tool.
    pub async fn register_tool(&self, tool: Arc<dyn Tool>) {
        let definition = tool.definition();
        let name = definition.name.clone();

        // Add category if new
        if let Some(ref category) = definition.category {
            let mut categories = self.categories.write().await;
            if !categories.contains(category) {
                categories.push(category.clone());
            }
        }

        let mut tools = self.tools.write().await;
        if tools.insert(name.clone(), tool).is_some() {
            warn!("Tool {} registered twice, keeping the latest", name);
        }
    }

    /// Register multiple tools.
    pub async fn register_tools(&self, tools: Vec<Arc<dyn Tool>>) {
        for tool in tools {
            self.register_tool(tool).await;
        }
    }

    /// Get all tool definitions, sorted by name.
    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<_> = tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Get tools by category.
    pub async fn list_tools_by_category(&self, category: &str) -> Vec<ToolDefinition> {
        self.list_tools()
            .await
            .into_iter()
            .filter(|d| d.category.as_deref() == Some(category))
            .collect()
    }

    /// Get all categories.
    pub async fn list_categories(&self) -> Vec<String> {
        self.categories.read().await.clone()
    }

    /// Execute a tool.
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let tool = {
            let tools = self.tools.read().await;
            tools
                .get(name)
                .cloned()
                .ok_or_else(|| McpServerError::ToolNotFound(name.to_string()))?
        };

        tool.execute(arguments, context).await
    }

    /// Handle an incoming message, returning `None` for notifications.
    pub async fn handle_message(&self, request: McpRequest) -> Option<McpResponse> {
        if request.is_notification() {
            debug!("Received notification {}", request.method);
            return None;
        }

        Some(self.handle_request(request).await)
    }

    /// Handle an MCP request.
    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "ping" => McpResponse::success(request.id, serde_json::json!({})),
            "tools/list" => self.handle_tools_list(request.id).await,
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => McpResponse::error(request.id, McpError::method_not_found(&request.method)),
        }
    }

    fn handle_initialize(&self, id: RequestId) -> McpResponse {
        let mut result = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": self.capabilities,
            "serverInfo": self.info
        });

        if let Some(ref instructions) = self.instructions {
            result["instructions"] = serde_json::Value::String(instructions.clone());
        }

        McpResponse::success(id, result)
    }

    async fn handle_tools_list(&self, id: RequestId) -> McpResponse {
        let tools = self.list_tools().await;
        McpResponse::success(id, serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        id: RequestId,
        params: Option<serde_json::Value>,
    ) -> McpResponse {
        let params = match params {
            Some(p) => p,
            None => return McpResponse::error(id, McpError::invalid_params("Missing params")),
        };

        let call: ToolCall = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => return McpResponse::error(id, McpError::invalid_params(e.to_string())),
        };

        let context = ToolContext::for_request(id.clone());

        let result = self
            .call_tool(&call.name, call.arguments, &context)
            .await
            .and_then(|result| {
                serde_json::to_value(result).map_err(|e| McpServerError::Internal(e.to_string()))
            });

        match result {
            Ok(value) => McpResponse::success(id, value),
            Err(e) => {
                warn!("tools/call {} failed: {}", call.name, e);
                McpResponse::error(id, e.into())
            }
        }
    }

    /// Get server info.
    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    /// Get server capabilities.
    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestTool;

    #[async_trait]
    impl Tool for TestTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("test_tool", "A test tool")
                .with_annotations(ToolAnnotations::read_only())
                .with_category("test")
        }

        async fn execute(
            &self,
            args: serde_json::Value,
            _context: &ToolContext,
        ) -> McpServerResult<ToolResult> {
            if args.get("fail").is_some() {
                return Err(McpServerError::InvalidParams("fail requested".to_string()));
            }
            Ok(ToolResult::text("Test result"))
        }
    }

    #[tokio::test]
    async fn test_server_creation() {
        let server = McpServer::harvestr();
        assert_eq!(server.info().name, "Harvestr MCP Server");
        assert!(server.capabilities().tools.is_some());
    }

    #[tokio::test]
    async fn test_register_tool() {
        let server = McpServer::harvestr();
        server.register_tool(Arc::new(TestTool)).await;

        let tools = server.list_tools().await;
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "test_tool");
        assert_eq!(server.list_categories().await, vec!["test".to_string()]);
        assert_eq!(server.list_tools_by_category("test").await.len(), 1);
        assert!(server.list_tools_by_category("users").await.is_empty());
    }

    #[tokio::test]
    async fn test_call_tool() {
        let server = McpServer::harvestr();
        server.register_tool(Arc::new(TestTool)).await;

        let context = ToolContext::empty();
        let result = server
            .call_tool("test_tool", serde_json::json!({}), &context)
            .await
            .unwrap();

        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_call_unknown_tool() {
        let server = McpServer::harvestr();
        let result = server
            .call_tool("missing", serde_json::json!({}), &ToolContext::empty())
            .await;
        assert!(matches!(result, Err(McpServerError::ToolNotFound(_))));
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let server = McpServer::harvestr();

        let req = McpRequest::new("1", "initialize");
        let resp = server.handle_request(req).await;

        let result = resp.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "Harvestr MCP Server");
        assert!(result["capabilities"]["tools"].is_object());
        assert!(result["instructions"]
            .as_str()
            .unwrap()
            .contains("HARVESTR_API_TOKEN"));
    }

    #[tokio::test]
    async fn test_handle_ping() {
        let server = McpServer::harvestr();
        let resp = server.handle_request(McpRequest::new(3i64, "ping")).await;
        assert_eq!(resp.result, Some(serde_json::json!({})));
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = McpServer::harvestr();
        let resp = server
            .handle_request(McpRequest::new("1", "resources/list"))
            .await;
        assert_eq!(resp.error.unwrap().code, McpError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_notifications_get_no_response() {
        let server = McpServer::harvestr();
        let resp = server
            .handle_message(McpRequest::notification("notifications/initialized"))
            .await;
        assert!(resp.is_none());
    }

    #[tokio::test]
    async fn test_tools_call_errors_map_to_invalid_params() {
        let server = McpServer::harvestr();
        server.register_tool(Arc::new(TestTool)).await;

        let missing_params = server
            .handle_request(McpRequest::new("1", "tools/call"))
            .await;
        assert_eq!(missing_params.error.unwrap().code, McpError::INVALID_PARAMS);

        let unknown = server
            .handle_request(
                McpRequest::new("2", "tools/call")
                    .with_params(serde_json::json!({"name": "missing", "arguments": {}})),
            )
            .await;
        assert_eq!(unknown.error.unwrap().code, McpError::INVALID_PARAMS);

        let bad_args = server
            .handle_request(McpRequest::new("3", "tools/call").with_params(
                serde_json::json!({"name": "test_tool", "arguments": {"fail": true}}),
            ))
            .await;
        assert_eq!(bad_args.error.unwrap().code, McpError::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let server = McpServer::harvestr();
        server.register_tool(Arc::new(TestTool)).await;

        let resp = server
            .handle_request(
                McpRequest::new("1", "tools/call")
                    .with_params(serde_json::json!({"name": "test_tool"})),
            )
            .await;

        let result = resp.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "Test result");
    }
}
