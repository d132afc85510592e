//! Attribute definition tools
//!
//! Attributes are the custom fields a workspace defines for users and
//! companies. Their values are read and written through the user and
//! company tools.

use super::{get, render};
use crate::client::SharedClient;
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Tool to list user attribute definitions.
pub struct ListUserAttributesTool {
    client: Arc<SharedClient>,
}

impl ListUserAttributesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListUserAttributesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_user_attributes",
            "List all user attributes defined in Harvestr. User attributes are custom fields \
             that can be set on users. Returns attribute definitions with id, name, type, and \
             timestamps.",
        )
        .with_category("attributes")
        .with_annotations(ToolAnnotations::read_only())
    }

    #[instrument(skip_all, fields(tool = "list_user_attributes", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        _args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        Ok(render(
            "harvestr_list_user_attributes",
            get(&self.client, "/attribute/user", None).await,
        ))
    }
}

/// Tool to list company attribute definitions.
pub struct ListCompanyAttributesTool {
    client: Arc<SharedClient>,
}

impl ListCompanyAttributesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListCompanyAttributesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_company_attributes",
            "List all company attributes defined in Harvestr. Company attributes are custom \
             fields that can be set on companies. Returns attribute definitions with id, name, \
             type, and timestamps.",
        )
        .with_category("attributes")
        .with_annotations(ToolAnnotations::read_only())
    }

    #[instrument(
        skip_all,
        fields(tool = "list_company_attributes", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        _args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        Ok(render(
            "harvestr_list_company_attributes",
            get(&self.client, "/attribute/company", None).await,
        ))
    }
}

/// Get all attribute tools.
pub fn attribute_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListUserAttributesTool::new(client.clone())),
        Arc::new(ListCompanyAttributesTool::new(client)),
    ]
}
