//! Feedback tools
//!
//! Feedback links a message to a discovery, carrying the highlighted
//! selections and a score.

use super::{get, parse_args, query, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Tool to list feedback, optionally by message or discovery.
pub struct ListFeedbackTool {
    client: Arc<SharedClient>,
}

impl ListFeedbackTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListFeedbackTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_feedback",
            "List all feedback in Harvestr with optional filtering. Feedback is the link \
             between messages and discoveries, containing selections (highlighted text) and \
             scores. Returns feedback objects with id, starred, score, selections, and \
             timestamps.",
        )
        .with_category("feedback")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "message_id": {
                    "type": "string",
                    "description": "Optional filter by message ID"
                },
                "discovery_id": {
                    "type": "string",
                    "description": "Optional filter by discovery ID"
                }
            },
            "required": []
        }))
    }

    #[instrument(skip_all, fields(tool = "list_feedback", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: ListFeedbackParams = parse_args(args)?;

        let filters = query([
            ("messageId", params.message_id),
            ("discoveryId", params.discovery_id),
        ]);
        Ok(render(
            "harvestr_list_feedback",
            get(&self.client, "/feedback", Some(filters)).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListFeedbackParams {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    discovery_id: Option<String>,
}

/// Tool to retrieve one feedback entry.
pub struct GetFeedbackTool {
    client: Arc<SharedClient>,
}

impl GetFeedbackTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetFeedbackTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_feedback",
            "Retrieve a specific feedback by ID. Returns the feedback with id, starred, score, \
             messageId, discoveryId, selections, and timestamps.",
        )
        .with_category("feedback")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "feedback_id": {
                    "type": "string",
                    "description": "The unique identifier of the feedback to retrieve"
                }
            },
            "required": ["feedback_id"]
        }))
    }

    #[instrument(skip_all, fields(tool = "get_feedback", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: GetFeedbackParams = parse_args(args)?;

        let endpoint = format!("/feedback/{}", params.feedback_id);
        Ok(render(
            "harvestr_get_feedback",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct GetFeedbackParams {
    feedback_id: String,
}

/// Get all feedback tools.
pub fn feedback_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListFeedbackTool::new(client.clone())),
        Arc::new(GetFeedbackTool::new(client)),
    ]
}
