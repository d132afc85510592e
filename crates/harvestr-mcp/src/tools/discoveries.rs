//! Discovery tools
//!
//! Discoveries are the feature requests, bugs and insights distilled from
//! feedback. Listing and lookup can expand custom field values through the
//! `select=discoveryfields` projection.

use super::{get, parse_args, query, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Projection that expands discovery field values.
const SELECT_FIELDS: &str = "discoveryfields";

fn select(include_fields: bool) -> Option<String> {
    include_fields.then(|| SELECT_FIELDS.to_string())
}

/// Tool to list discoveries.
pub struct ListDiscoveriesTool {
    client: Arc<SharedClient>,
}

impl ListDiscoveriesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListDiscoveriesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_discoveries",
            "List all discoveries in Harvestr with optional filtering. Discoveries represent \
             feature requests, bugs, or insights gathered from feedback. Returns discovery \
             objects with id, title, description, state, and more.",
        )
        .with_category("discoveries")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "parent_id": {
                    "type": "string",
                    "description": "Optional filter by parent ID (component or discovery)"
                },
                "include_fields": {
                    "type": "boolean",
                    "description": "Whether to include discovery field values in the response",
                    "default": false
                }
            },
            "required": []
        }))
    }

    #[instrument(skip_all, fields(tool = "list_discoveries", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: ListDiscoveriesParams = parse_args(args)?;

        let filters = query([
            ("parentId", params.parent_id),
            ("select", select(params.include_fields)),
        ]);
        Ok(render(
            "harvestr_list_discoveries",
            get(&self.client, "/discovery", Some(filters)).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListDiscoveriesParams {
    #[serde(default)]
    parent_id: Option<String>,
    #[serde(default)]
    include_fields: bool,
}

/// Tool to retrieve one discovery.
pub struct GetDiscoveryTool {
    client: Arc<SharedClient>,
}

impl GetDiscoveryTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetDiscoveryTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_discovery",
            "Retrieve a specific discovery by ID. Returns the discovery with id, title, \
             description, discoveryStateId, parentId, parentType, assigneeId, tags, and \
             timestamps.",
        )
        .with_category("discoveries")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "discovery_id": {
                    "type": "string",
                    "description": "The unique identifier of the discovery to retrieve"
                },
                "include_fields": {
                    "type": "boolean",
                    "description": "Whether to include discovery field values in the response",
                    "default": false
                }
            },
            "required": ["discovery_id"]
        }))
    }

    #[instrument(skip_all, fields(tool = "get_discovery", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: GetDiscoveryParams = parse_args(args)?;
        debug!("Fetching discovery {}", params.discovery_id);

        let endpoint = format!("/discovery/{}", params.discovery_id);
        let filters = query([("select", select(params.include_fields))]);
        Ok(render(
            "harvestr_get_discovery",
            get(&self.client, &endpoint, Some(filters)).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct GetDiscoveryParams {
    discovery_id: String,
    #[serde(default)]
    include_fields: bool,
}

/// Tool to read the current workflow state of a discovery.
pub struct GetDiscoveryStateTool {
    client: Arc<SharedClient>,
}

impl GetDiscoveryStateTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetDiscoveryStateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_discovery_state",
            "Get the current state of a specific discovery. Returns the discovery state with \
             id, name, and timestamps.",
        )
        .with_category("discoveries")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(discovery_id_schema())
    }

    #[instrument(skip_all, fields(tool = "get_discovery_state", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: DiscoveryIdParams = parse_args(args)?;

        let endpoint = format!("/discovery/{}/discovery-state", params.discovery_id);
        Ok(render(
            "harvestr_get_discovery_state",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

/// Tool to list the feedback linked to a discovery.
pub struct ListDiscoveryFeedbackTool {
    client: Arc<SharedClient>,
}

impl ListDiscoveryFeedbackTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListDiscoveryFeedbackTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_discovery_feedback",
            "List all feedback associated with a specific discovery.",
        )
        .with_category("discoveries")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(discovery_id_schema())
    }

    #[instrument(
        skip_all,
        fields(tool = "list_discovery_feedback", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: DiscoveryIdParams = parse_args(args)?;

        let endpoint = format!("/discovery/{}/feedback", params.discovery_id);
        Ok(render(
            "harvestr_list_discovery_feedback",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct DiscoveryIdParams {
    discovery_id: String,
}

fn discovery_id_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "discovery_id": {
                "type": "string",
                "description": "The unique identifier of the discovery"
            }
        },
        "required": ["discovery_id"]
    })
}

/// Get all discovery tools.
pub fn discovery_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListDiscoveriesTool::new(client.clone())),
        Arc::new(GetDiscoveryTool::new(client.clone())),
        Arc::new(GetDiscoveryStateTool::new(client.clone())),
        Arc::new(ListDiscoveryFeedbackTool::new(client)),
    ]
}
