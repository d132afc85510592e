//! Company tools
//!
//! Tools for listing, creating and updating Harvestr companies, and for
//! reading or updating their custom attribute values.

use super::{
    attribute_values_body, attribute_values_schema, get, parse_args, patch, post, query, render,
    to_body, AttributeValueEntries,
};
use crate::client::SharedClient;
use crate::models::{CompanyCreate, CompanyUpdate};
use crate::server::{McpServerResult, Tool, ToolContext};
use crate::types::{ToolAnnotations, ToolDefinition, ToolResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Tool to list companies, optionally filtered by external UID.
pub struct ListCompaniesTool {
    client: Arc<SharedClient>,
}

impl ListCompaniesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListCompaniesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_companies",
            "List all companies in Harvestr with optional filtering. Returns company objects \
             with id, name, segments, and timestamps.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "external_uid": {
                    "type": "string",
                    "description": "Optional filter by external unique identifier"
                }
            },
            "required": []
        }))
    }

    #[instrument(skip_all, fields(tool = "list_companies", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: ListCompaniesParams = parse_args(args)?;

        let filters = query([("externalUid", params.external_uid)]);
        Ok(render(
            "harvestr_list_companies",
            get(&self.client, "/company", Some(filters)).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ListCompaniesParams {
    #[serde(default)]
    external_uid: Option<String>,
}

/// Tool to create a company.
pub struct CreateCompanyTool {
    client: Arc<SharedClient>,
}

impl CreateCompanyTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for CreateCompanyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_create_company",
            "Create a new company in Harvestr. Returns the created company with id, name, \
             segments, and timestamps.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::create())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "name": {
                    "type": "string",
                    "description": "The name of the company"
                },
                "external_uid": {
                    "type": "string",
                    "description": "Optional external unique identifier for the company"
                },
                "segment_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Optional list of segment IDs to associate with the company"
                }
            },
            "required": ["name"]
        }))
    }

    #[instrument(skip_all, fields(tool = "create_company", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: CreateCompanyParams = parse_args(args)?;
        debug!("Creating company {}", params.name);

        let payload = CompanyCreate {
            name: params.name,
            external_uid: params.external_uid.filter(|uid| !uid.is_empty()),
            segment_ids: params.segment_ids.filter(|ids| !ids.is_empty()),
        };
        let body = to_body(&payload)?;

        Ok(render(
            "harvestr_create_company",
            post(&self.client, "/company", &body).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CreateCompanyParams {
    name: String,
    #[serde(default)]
    external_uid: Option<String>,
    #[serde(default)]
    segment_ids: Option<Vec<String>>,
}

/// Tool to retrieve one company.
pub struct GetCompanyTool {
    client: Arc<SharedClient>,
}

impl GetCompanyTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for GetCompanyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_get_company",
            "Retrieve a specific company by ID. Returns the company with id, name, segments, \
             and timestamps.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(company_id_schema(
            "The unique identifier of the company to retrieve",
        ))
    }

    #[instrument(skip_all, fields(tool = "get_company", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: CompanyIdParams = parse_args(args)?;
        debug!("Fetching company {}", params.company_id);

        let endpoint = format!("/company/{}", params.company_id);
        Ok(render(
            "harvestr_get_company",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct CompanyIdParams {
    company_id: String,
}

/// Tool to update a company. Only the provided fields are changed.
pub struct UpdateCompanyTool {
    client: Arc<SharedClient>,
}

impl UpdateCompanyTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateCompanyTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_update_company",
            "Update an existing company in Harvestr. Returns the updated company.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::update())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "company_id": {
                    "type": "string",
                    "description": "The unique identifier of the company to update"
                },
                "name": {
                    "type": "string",
                    "description": "New name for the company"
                },
                "external_uid": {
                    "type": "string",
                    "description": "New external unique identifier for the company"
                },
                "segment_ids": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "New list of segment IDs to associate with the company"
                }
            },
            "required": ["company_id"]
        }))
    }

    #[instrument(skip_all, fields(tool = "update_company", correlation_id = %context.correlation_id))]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: UpdateCompanyParams = parse_args(args)?;
        debug!("Updating company {}", params.company_id);

        // An explicitly empty value is still an update, e.g. clearing segments.
        let payload = CompanyUpdate {
            name: params.name,
            external_uid: params.external_uid,
            segment_ids: params.segment_ids,
        };
        let body = to_body(&payload)?;

        let endpoint = format!("/company/{}", params.company_id);
        Ok(render(
            "harvestr_update_company",
            patch(&self.client, &endpoint, &body).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct UpdateCompanyParams {
    company_id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    external_uid: Option<String>,
    #[serde(default)]
    segment_ids: Option<Vec<String>>,
}

/// Tool to list a company's attribute values.
pub struct ListCompanyAttributeValuesTool {
    client: Arc<SharedClient>,
}

impl ListCompanyAttributeValuesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for ListCompanyAttributeValuesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_list_company_attribute_values",
            "List attribute values for a specific company.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::read_only())
        .with_schema(company_id_schema("The unique identifier of the company"))
    }

    #[instrument(
        skip_all,
        fields(tool = "list_company_attribute_values", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: CompanyIdParams = parse_args(args)?;

        let endpoint = format!("/company/{}/attribute-values", params.company_id);
        Ok(render(
            "harvestr_list_company_attribute_values",
            get(&self.client, &endpoint, None).await,
        ))
    }
}

/// Tool to update a company's attribute values.
pub struct UpdateCompanyAttributeValuesTool {
    client: Arc<SharedClient>,
}

impl UpdateCompanyAttributeValuesTool {
    /// Create the tool over a shared client.
    pub fn new(client: Arc<SharedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Tool for UpdateCompanyAttributeValuesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "harvestr_update_company_attribute_values",
            "Update attribute values for a specific company. Returns the updated attribute values.",
        )
        .with_category("companies")
        .with_annotations(ToolAnnotations::update())
        .with_schema(serde_json::json!({
            "type": "object",
            "properties": {
                "company_id": {
                    "type": "string",
                    "description": "The unique identifier of the company"
                },
                "attribute_values": attribute_values_schema()
            },
            "required": ["company_id", "attribute_values"]
        }))
    }

    #[instrument(
        skip_all,
        fields(tool = "update_company_attribute_values", correlation_id = %context.correlation_id)
    )]
    async fn execute(
        &self,
        args: serde_json::Value,
        context: &ToolContext,
    ) -> McpServerResult<ToolResult> {
        let params: UpdateCompanyAttributeValuesParams = parse_args(args)?;
        debug!(
            "Updating {} attribute values for company {}",
            params.attribute_values.len(),
            params.company_id
        );

        let endpoint = format!("/company/{}/attribute-values", params.company_id);
        let body = attribute_values_body(params.attribute_values);
        Ok(render(
            "harvestr_update_company_attribute_values",
            patch(&self.client, &endpoint, &body).await,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct UpdateCompanyAttributeValuesParams {
    company_id: String,
    attribute_values: AttributeValueEntries,
}

fn company_id_schema(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "company_id": {
                "type": "string",
                "description": description
            }
        },
        "required": ["company_id"]
    })
}

/// Get all company tools.
pub fn company_tools(client: Arc<SharedClient>) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(ListCompaniesTool::new(client.clone())),
        Arc::new(CreateCompanyTool::new(client.clone())),
        Arc::new(GetCompanyTool::new(client.clone())),
        Arc::new(UpdateCompanyTool::new(client.clone())),
        Arc::new(ListCompanyAttributeValuesTool::new(client.clone())),
        Arc::new(UpdateCompanyAttributeValuesTool::new(client)),
    ]
}
