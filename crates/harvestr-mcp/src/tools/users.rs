//! User tools
//!
//! Tools for listing Harvestr users and reading or updating their custom
//! attribute values.

use super::{
    attribute_values_body, attribute_values_schema, get, parse_args, patch, render,
    AttributeValueEntries,
};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tool to list all users.
pub struct ListUsersTool {
    client: Arc<SharedClient>,
}

impl ListUsersTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListUsersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_users",
            "List all users in Harvestr. Returns user objects with id, email, name, \
             and timestamps.",
        )
        .with_category("users")
        .with_annotations(ToolAnnotations::read_only())
    }

    #[instrument(skip_all, fields(tool = "list_users", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        _args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        Ok(render(
            "harvestr_list_users",
            get(&self.client, "/user", None).await,
        ))
    }
}

/// Tool to retrieve one user.
pub struct GetUserTool {
    client: Arc<SharedClient>,
}

impl GetUserTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetUserTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_user",
            "Retrieve a specific user by ID. Returns the user with id, email, name, \
             and timestamps.",
        )
        .with_category("users")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The unique identifier of the user to retrieve"
                }
            },
            "required": ["user_id"]
        }))
    }

    #[instrument(skip_all, fields(tool = "get_user", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: UserIdParams = parse_args(args)?;
        debug!("Fetching user {}", params.user_id);

        let endpoint = format!("/user/{}", params.user_id);
        Ok(render(
            "harvestr_get_user",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct UserIdParams {
    user_id: String,
}

/// Tool to list a user's attribute values.
pub struct ListUserAttributeValuesTool {
    client: Arc<SharedClient>,
}

impl ListUserAttributeValuesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListUserAttributeValuesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_user_attribute_values",
            "List attribute values for a specific user.",
        )
        .with_category("users")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The unique identifier of the user"
                }
            },
            "required": ["user_id"]
        }))
    }

    #[instrument(
        skip_all,
        fields(tool = "list_user_attribute_values", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: UserIdParams = parse_args(args)?;

        let endpoint = format!("/user/{}/attribute-values", params.user_id);
        Ok(render(
            "harvestr_list_user_attribute_values",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

/// Tool to update a user's attribute values.
pub struct UpdateUserAttributeValuesTool {
    client: Arc<SharedClient>,
}

impl UpdateUserAttributeValuesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateUserAttributeValuesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_update_user_attribute_values",
            "Update attribute values for a specific user. Returns the updated attribute values.",
        )
        .with_category("users")
        .with_annotations(ToolAnnotations::update())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "The unique identifier of the user"
                },
                "attribute_values": attribute_values_schema()
            },
            "required": ["user_id", "attribute_values"]
        }))
    }

    #[instrument(
        skip_all,
        fields(tool = "update_user_attribute_values", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: UpdateUserAttributeValuesParams = parse_args(args)?;
        debug!(
            "Updating {} attribute values for user {}",
            params.attribute_values.len(),
            params.user_id
        );

        let endpoint = format!("/user/{}/attribute-values", params.user_id);
        let body = attribute_values_body(params.attribute_values);
        Ok(render(
            "harvestr_update_user_attribute_values",
            patch(&self.client, &endpoint, &body).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct UpdateUserAttributeValuesParams {
    user_id: String,
    attribute_values: AttributeValueEntries,
}

/// Get all user tools.
pub fn user_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListUsersTool::new(client.clone())),
        Arc::new(GetUserTool::new(client.clone())),
        Arc::new(ListUserAttributeValuesTool::new(client.clone())),
        Arc::new(UpdateUserAttributeValuesTool::new(client)),
    ]
}
