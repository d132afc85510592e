//! Harvestr MCP tools
//!
//! One module per Harvestr resource. Every tool parses its arguments, issues
//! a single call through the shared [`HarvestrClient`](crate::client::HarvestrClient),
//! and renders the decoded JSON (or the client error) as tool output.

pub mod attributes;
pub mod companies;
pub mod components;
pub mod discoveries;
pub mod discovery_states;
pub mod feedback;
pub mod messages;
pub mod users;

pub use attributes::*;
pub use companies::*;
pub use components::*;
pub use discoveries::*;
pub use discovery_states::*;
pub use feedback::*;
pub use messages::*;
pub use users::*;

use crate::client::{HarvestrResult, QueryParams, SharedClient};
use crate::server::{McpServerError, McpServerResult, Tool};
use crate::types::ToolResult;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Get all available MCP tools.
///
/// Returns every Harvestr tool, each holding a handle to `client`:
/// - Users: list, get, attribute values
/// - Companies: list, create, get, update, attribute values
/// - Components: list, get
/// - Discoveries: list, get, state, feedback
/// - Discovery states: list, get
/// - Messages: list, get, feedback
/// - Feedback: list, get
/// - Attributes: user and company attribute definitions
///
/// # Example
///
/// ```rust,no_run
/// use harvestr_mcp::client::SharedClient;
/// use harvestr_mcp::tools::all_tools;
/// use std::sync::Arc;
///
/// let tools = all_tools(Arc::new(SharedClient::from_env()));
/// println!("Available tools: {}", tools.len());
/// ```
pub fn all_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    let mut tools = Vec::new();

    // Users (4)
    tools.extend(user_tools(client.clone()));

    // Companies (6)
    tools.extend(company_tools(client.clone()));

    // Components (2)
    tools.extend(component_tools(client.clone()));

    // Discoveries (4)
    tools.extend(discovery_tools(client.clone()));

    // Discovery states (2)
    tools.extend(discovery_state_tools(client.clone()));

    // Messages (3)
    tools.extend(message_tools(client.clone()));

    // Feedback (2)
    tools.extend(feedback_tools(client.clone()));

    // Attributes (2)
    tools.extend(attribute_tools(client));

    tools
}

/// Deserialize tool arguments into a parameter struct.
pub(crate) fn parse_args<T: DeserializeOwned>(args: Value) -> McpServerResult<T> {
    // Clients may send `null` for tools without arguments.
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };

    serde_json::from_value(args).map_err(|e| McpServerError::InvalidParams(e.to_string()))
}

/// Build GET query parameters.
///
/// Absent or empty values become `null`, which the client drops before
/// sending.
pub(crate) fn query<const N: usize>(pairs: [(&str, Option<String>); N]) -> QueryParams {
    pairs
        .into_iter()
        .map(|(key, value)| {
            let value = value
                .filter(|v| !v.is_empty())
                .map(Value::String)
                .unwrap_or(Value::Null);
            (key.to_string(), value)
        })
        .collect()
}

/// GET through the shared client.
pub(crate) async fn get(
    client: &SharedClient,
    endpoint: &str,
    params: Option<QueryParams>,
) -> HarvestrResult<Option<Value>> {
    client.get()?.get(endpoint, params).await
}

/// POST through the shared client.
pub(crate) async fn post(
    client: &SharedClient,
    endpoint: &str,
    body: &Value,
) -> HarvestrResult<Option<Value>> {
    client.get()?.post(endpoint, Some(body)).await
}

/// PATCH through the shared client.
pub(crate) async fn patch(
    client: &SharedClient,
    endpoint: &str,
    body: &Value,
) -> HarvestrResult<Option<Value>> {
    client.get()?.patch(endpoint, Some(body)).await
}

/// Render a client result as tool output.
///
/// Payloads are pretty-printed JSON (`null` for no content). Client errors
/// become error results reading `Error: <message>`.
pub(crate) fn render(tool: &str, result: HarvestrResult<Option<Value>>) -> ToolResult {
    match result {
        Ok(payload) => ToolResult::json(payload.unwrap_or(Value::Null)),
        Err(e) => {
            warn!("{} failed: {}", tool, e);
            ToolResult::error(format!("Error: {}", e))
        }
    }
}

/// Attribute value entries as given by the caller.
///
/// Each entry must be an object; its keys and value types are not checked
/// and reach the API unchanged.
pub(crate) type AttributeValueEntries = Vec<serde_json::Map<String, Value>>;

/// PATCH body for an attribute value update.
pub(crate) fn attribute_values_body(entries: AttributeValueEntries) -> Value {
    Value::Array(entries.into_iter().map(Value::Object).collect())
}

/// Input schema for an `attribute_values` argument.
pub(crate) fn attribute_values_schema() -> Value {
    serde_json::json!({
        "type": "array",
        "description": "List of attribute value objects with 'attributeId' and 'value' keys",
        "items": {
            "type": "object",
            "properties": {
                "attributeId": {"type": "string"},
                "value": {"description": "New value; strings, numbers and booleans are accepted"}
            },
            "required": ["attributeId", "value"]
        }
    })
}

/// Serialize a request body. Only fails for non-string map keys, which the
/// payload types never have.
pub(crate) fn to_body<T: serde::Serialize>(payload: &T) -> McpServerResult<Value> {
    serde_json::to_value(payload).map_err(|e| McpServerError::Internal(e.to_string()))
}
