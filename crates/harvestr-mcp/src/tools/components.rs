//! Component tools
//!
//! Components are the product areas of a Harvestr workspace. They form a
//! tree navigable through `parentId`.

use super::{get, parse_args, query, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Tool to list components, optionally under one parent.
pub struct ListComponentsTool {
    client: Arc<SharedClient>,
}

impl ListComponentsTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListComponentsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_components",
            "List all components in Harvestr with optional parent filtering. Components \
             represent product areas or features. Returns component objects with id, title, \
             description, and timestamps.",
        )
        .with_category("components")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "parent_id": {
                    "type": "string",
                    "description": "Optional filter by parent component ID for hierarchy navigation"
                }
            },
            "required": []
        }))
    }

    #[instrument(skip_all, fields(tool = "list_components", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: ListComponentsParams = parse_args(args)?;

        let filters = query([("parentId", params.parent_id)]);
        Ok(render(
            "harvestr_list_components",
            get(&self.client, "/component", Some(filters)).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListComponentsParams {
    #[serde(default)]
    parent_id: Option<String>,
}

/// Tool to retrieve one component.
pub struct GetComponentTool {
    client: Arc<SharedClient>,
}

impl GetComponentTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetComponentTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_component",
            "Retrieve a specific component by ID. Returns the component with id, title, \
             description, parentId, and timestamps.",
        )
        .with_category("components")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "component_id": {
                    "type": "string",
                    "description": "The unique identifier of the component to retrieve"
                }
            },
            "required": ["component_id"]
        }))
    }

    #[instrument(skip_all, fields(tool = "get_component", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: GetComponentParams = parse_args(args)?;

        let endpoint = format!("/component/{}", params.component_id);
        Ok(render(
            "harvestr_get_component",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct GetComponentParams {
    component_id: String,
}

/// Get all component tools.
pub fn component_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListComponentsTool::new(client.clone())),
        Arc::new(GetComponentTool::new(client)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientConfig;

    #[test]
    fn test_list_components_parent_is_optional() {
        let client = Arc::new(SharedClient::new(ClientConfig::with_token("t1")));
        let def = ListComponentsTool::new(client).definition();
        assert_eq!(def.input_schema["required"], serde_json::json!([]));
        assert!(def.input_schema["properties"]["parent_id"].is_object());
    }
}
