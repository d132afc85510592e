//! Message tools
//!
//! Messages are the raw customer communications feedback is extracted from.

use super::{get, parse_args, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

/// Tool to list all messages.
pub struct ListMessagesTool {
    client: Arc<SharedClient>,
}

impl ListMessagesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListMessagesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_messages",
            "List all messages in Harvestr. Messages represent customer communications or \
             feedback entries. Returns message objects with id, content, authorId, and \
             timestamps.",
        )
        .with_category("messages")
        .with_annotations(ToolAnnotations::read_only())
    }

    #[instrument(skip_all, fields(tool = "list_messages", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        _args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        Ok(render(
            "harvestr_list_messages",
            get(&self.client, "/message", None).await,
        ))
    }
}

/// Tool to retrieve one message.
pub struct GetMessageTool {
    client: Arc<SharedClient>,
}

impl GetMessageTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetMessageTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_message",
            "Retrieve a specific message by ID. Returns the message with id, content, \
             authorId, and timestamps.",
        )
        .with_category("messages")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(message_id_schema(
            "The unique identifier of the message to retrieve",
        ))
    }

    #[instrument(skip_all, fields(tool = "get_message", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: MessageIdParams = parse_args(args)?;

        let endpoint = format!("/message/{}", params.message_id);
        Ok(render(
            "harvestr_get_message",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

/// Tool to list the feedback extracted from a message.
pub struct ListMessageFeedbackTool {
    client: Arc<SharedClient>,
}

impl ListMessageFeedbackTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListMessageFeedbackTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_message_feedback",
            "List all feedback associated with a specific message.",
        )
        .with_category("messages")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(message_id_schema("The unique identifier of the message"))
    }

    #[instrument(
        skip_all,
        fields(tool = "list_message_feedback", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: MessageIdParams = parse_args(args)?;

        let endpoint = format!("/message/{}/feedback", params.message_id);
        Ok(render(
            "harvestr_list_message_feedback",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct MessageIdParams {
    message_id: String,
}

fn message_id_schema(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "message_id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["message_id"]
    })
}

/// Get all message tools.
pub fn message_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListMessagesTool::new(client.clone())),
        Arc::new(GetMessageTool::new(client.clone())),
        Arc::new(ListMessageFeedbackTool::new(client)),
    ]
}
