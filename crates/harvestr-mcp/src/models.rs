//! Harvestr API records.
//!
//! Typed views of the entities the Harvestr API returns, plus the payloads
//! the tools send when creating or updating them. Field names follow the
//! API's camelCase wire format; timestamps are RFC 3339.
//!
//! The client itself passes JSON through untouched, so these types are
//! opt-in: deserialize a tool result with `serde_json::from_value` when a
//! typed view is wanted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A Harvestr company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Identifier from the import that created the company, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,

    /// Identifier of the company in the caller's own system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uid: Option<String>,

    #[serde(default)]
    pub segments: Vec<Segment>,
}

/// Payload for creating a company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyCreate {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_ids: Option<Vec<String>>,
}

/// Payload for updating a company. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_uid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_ids: Option<Vec<String>>,
}

/// A product area or feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Parent component, `None` at the top of the hierarchy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// A custom discovery field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryField {
    pub id: String,
    pub client_id: String,
    pub name: String,
}

/// The value of a custom field on a discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryFieldValue {
    pub field: DiscoveryField,
    pub value: String,
}

/// What a discovery hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParentType {
    Component,
    Discovery,
    None,
}

/// A feature request, bug or insight gathered from feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub discovery_state_id: String,
    pub parent_id: String,
    pub parent_type: ParentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    pub last_discoverystate_updated_at: DateTime<Utc>,
    pub last_feedback: String,

    /// Present only when requested with `select=discoveryfields`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_values: Option<Vec<DiscoveryFieldValue>>,
}

/// A workflow stage for discoveries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryState {
    pub id: String,
    pub client_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A highlighted part of a message attached to feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub content: String,
    pub full_selection: bool,
}

/// Link between a message and a discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub starred: bool,

    #[serde(default)]
    pub score: i64,

    pub message_id: String,
    pub discovery_id: String,

    #[serde(default)]
    pub selections: Vec<Selection>,
}

/// A customer communication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub client_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
}

/// A Harvestr user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A custom attribute definition for users or companies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribute {
    pub id: String,
    pub client_id: String,
    pub name: String,

    /// Attribute value type as reported by the API.
    #[serde(rename = "type")]
    pub kind: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A value for one attribute, as read and as sent in updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeValue {
    pub attribute_id: String,
    pub value: String,
}
