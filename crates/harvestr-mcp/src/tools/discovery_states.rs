//! Discovery state tools

use super::{get, parse_args, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Tool to list the workflow stages discoveries move through.
pub struct ListDiscoveryStatesTool {
    client: Arc<SharedClient>,
}

impl ListDiscoveryStatesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListDiscoveryStatesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_discovery_states",
            "List all discovery states in Harvestr. Discovery states are the workflow stages \
             for discoveries (e.g. New, In Progress, Done). Returns state objects with id, \
             name, and timestamps.",
        )
        .with_category("discovery_states")
        .with_annotations(ToolAnnotations::read_only())
    }

    #[instrument(skip_all, fields(tool = "list_discovery_states", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        _args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        Ok(render(
            "harvestr_list_discovery_states",
            get(&self.client, "/discovery-state", None).await,
        ))
    }
}

/// Tool to retrieve one discovery state.
pub struct GetDiscoveryStateByIdTool {
    client: Arc<SharedClient>,
}

impl GetDiscoveryStateByIdTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetDiscoveryStateByIdTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_discovery_state_by_id",
            "Retrieve a specific discovery state by ID. Returns the state with id, name, and \
             timestamps.",
        )
        .with_category("discovery_states")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "state_id": {
                    "type": "string",
                    "description": "The unique identifier of the discovery state"
                }
            },
            "required": ["state_id"]
        }))
    }

    #[instrument(
        skip_all,
        fields(tool = "get_discovery_state_by_id", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: StateIdParams = parse_args(args)?;

        let endpoint = format!("/discovery-state/{}", params.state_id);
        Ok(render(
            "harvestr_get_discovery_state_by_id",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct StateIdParams {
    state_id: String,
}

/// Get all discovery state tools.
pub fn discovery_state_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListDiscoveryStatesTool::new(client.clone())),
        Arc::new(GetDiscoveryStateByIdTool::new(client)),
    ]
}
