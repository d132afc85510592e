//! # Harvestr MCP
//!
//! This crate provides an MCP (Model Context Protocol) server for the
//! [Harvestr.io](https://harvestr.io) product management API, letting an AI
//! assistant browse and update customer feedback data.
//!
//! ## Overview
//!
//! The harvestr-mcp crate handles:
//! - **Client**: An authenticated HTTP client for the Harvestr REST API
//! - **Models**: Typed records for the resources the API returns
//! - **Tools**: One MCP tool per Harvestr operation
//! - **JSON-RPC**: MCP protocol dispatch over a newline-delimited stream
//!
//! ## MCP Protocol
//!
//! Supported methods:
//! - `initialize`: Initialize the MCP session
//! - `ping`: Liveness check
//! - `tools/list`: List available tools
//! - `tools/call`: Execute a tool
//!
//! Messages without an `id` are notifications and get no response.
//!
//! ## Available Tools
//!
//! ### Users
//! - `harvestr_list_users`, `harvestr_get_user`
//! - `harvestr_list_user_attribute_values`, `harvestr_update_user_attribute_values`
//!
//! ### Companies
//! - `harvestr_list_companies`, `harvestr_get_company`
//! - `harvestr_create_company`, `harvestr_update_company`
//! - `harvestr_list_company_attribute_values`, `harvestr_update_company_attribute_values`
//!
//! ### Components
//! - `harvestr_list_components`, `harvestr_get_component`
//!
//! ### Discoveries
//! - `harvestr_list_discoveries`, `harvestr_get_discovery`
//! - `harvestr_get_discovery_state`, `harvestr_list_discovery_feedback`
//!
//! ### Discovery States
//! - `harvestr_list_discovery_states`, `harvestr_get_discovery_state_by_id`
//!
//! ### Messages
//! - `harvestr_list_messages`, `harvestr_get_message`, `harvestr_list_message_feedback`
//!
//! ### Feedback
//! - `harvestr_list_feedback`, `harvestr_get_feedback`
//!
//! ### Attributes
//! - `harvestr_list_user_attributes`, `harvestr_list_company_attributes`
//!
//! ## Usage
//!
//! ### Calling the API directly
//!
//! ```rust,no_run
//! use harvestr_mcp::client::HarvestrClient;
//!
//! async fn fetch() -> Result<(), harvestr_mcp::client::HarvestrError> {
//!     let client = HarvestrClient::new(Some("my-token".to_string()))?;
//!     let company = client.get("/company/c-1", None).await?;
//!     println!("{:?}", company);
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ### Serving MCP over stdio
//!
//! ```rust,no_run
//! use harvestr_mcp::client::SharedClient;
//! use harvestr_mcp::tools::all_tools;
//! use harvestr_mcp::{serve_stdio, McpServer};
//! use std::sync::Arc;
//!
//! async fn run() -> Result<(), harvestr_mcp::TransportError> {
//!     let client = Arc::new(SharedClient::from_env());
//!     let server = McpServer::harvestr();
//!     server.register_tools(all_tools(client.clone())).await;
//!
//!     serve_stdio(&server).await?;
//!     client.reset();
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod models;
pub mod server;
pub mod tools;
pub mod transport;
pub mod types;

// Re-export main types
pub use client::{ClientConfig, HarvestrClient, HarvestrError, HarvestrResult, SharedClient};
pub use server::{McpServer, McpServerError, McpServerResult, Tool, ToolContext};
pub use transport::{serve, serve_stdio, TransportError};
pub use types::{
    ContentBlock, McpError, McpRequest, McpResponse, RequestId, ServerCapabilities, ServerInfo,
    ToolAnnotations, ToolCall, ToolCapabilities, ToolDefinition, ToolResult,
};

// Re-export the tool catalog
pub use tools::all_tools;
