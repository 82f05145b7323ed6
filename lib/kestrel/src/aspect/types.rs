//! Payloads and results of the aspect service.

use bytes::Bytes;
use kestrel_core::{Format, Validate, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

use super::views::ASPECT_VIEWS;
use crate::links::Links;

/// Default page size of `list`.
pub const DEFAULT_LIMIT: i64 = 10;
/// Largest page size `list` accepts.
pub const MAX_LIMIT: i64 = 50;

const fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Payload of `list`. Every attribute but `jwt` travels in the query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListAspectsPayload {
    /// Entity the aspects describe (URI).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// Schema the aspects conform to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Path inside the content to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_path: Option<String>,
    /// Point in time to list at (date-time).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_time: Option<String>,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Attribute to order by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Descending order.
    #[serde(default)]
    pub order_desc: bool,
    /// Whether items carry their content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_content: Option<bool>,
    /// Opaque page token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Bearer credential.
    #[serde(skip)]
    pub jwt: String,
}

impl Default for ListAspectsPayload {
    fn default() -> Self {
        Self {
            entity: None,
            schema: None,
            content_path: None,
            at_time: None,
            limit: DEFAULT_LIMIT,
            filter: None,
            order_by: None,
            order_desc: false,
            include_content: None,
            page: None,
            jwt: String::new(),
        }
    }
}

impl Validate for ListAspectsPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("ListAspectsPayload");
        v.format("entity", self.entity.as_deref(), Format::Uri)
            .format("at-time", self.at_time.as_deref(), Format::DateTime)
            .range("limit", Some(self.limit), 1, MAX_LIMIT);
        v.finish()
    }
}

/// Payload of `read`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadAspectPayload {
    /// Aspect identifier (URI).
    pub id: String,
    /// View to render the aspect in; `None` selects `default`.
    pub view: Option<String>,
    /// Bearer credential.
    pub jwt: String,
}

impl Validate for ReadAspectPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("ReadAspectPayload");
        v.format("id", Some(self.id.as_str()), Format::Uri).one_of(
            "view",
            self.view.as_deref(),
            &ASPECT_VIEWS.names(),
        );
        v.finish()
    }
}

/// Payload of `create`. The content is the request body, sent as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateAspectPayload {
    /// Entity the aspect describes (URI).
    pub entity: String,
    /// Schema the content conforms to.
    pub schema: String,
    /// Conflict policy.
    pub policy: Option<String>,
    /// Media type of `content`.
    pub content_type: String,
    /// Opaque content.
    pub content: Bytes,
    /// Bearer credential.
    pub jwt: String,
}

impl Validate for CreateAspectPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("CreateAspectPayload");
        v.format("entity", Some(self.entity.as_str()), Format::Uri)
            .require_present("schema", !self.schema.is_empty());
        v.finish()
    }
}

/// Payload of `retract`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetractAspectPayload {
    /// Aspect identifier (URI).
    pub id: String,
    /// Bearer credential.
    pub jwt: String,
}

impl Validate for RetractAspectPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("RetractAspectPayload");
        v.format("id", Some(self.id.as_str()), Format::Uri);
        v.finish()
    }
}

/// Query string of `read`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ViewQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

/// Query string of `create`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CreateQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
}

impl Validate for CreateQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("CreateAspectPayload");
        v.require("entity", self.entity.as_ref())
            .require("schema", self.schema.as_ref().filter(|schema| !schema.is_empty()));
        v.finish()
    }
}

/// An aspect: a schema-typed statement about an entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AspectRT {
    /// Identifier (URI).
    pub id: String,
    /// Entity the aspect describes (URI).
    pub entity: String,
    /// Schema the content conforms to.
    pub schema: String,
    /// Opaque content, passed through uninterpreted.
    pub content: Option<serde_json::Value>,
    /// Media type of the content.
    pub content_type: Option<String>,
    /// Start of validity (date-time).
    pub valid_from: Option<String>,
    /// End of validity (date-time).
    pub valid_to: Option<String>,
    /// Who asserted the aspect.
    pub asserter: Option<String>,
    /// Who retracted the aspect.
    pub retracter: Option<String>,
}

/// One entry of a `list` page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AspectListItem {
    /// Identifier (URI).
    pub id: String,
    /// Entity (URI).
    pub entity: String,
    /// Schema.
    pub schema: String,
    /// Opaque content, when requested.
    pub content: Option<serde_json::Value>,
    /// Media type of the content.
    pub content_type: Option<String>,
}

/// One page of aspects.
#[derive(Debug, Clone, PartialEq)]
pub struct AspectListResult {
    /// The page.
    pub items: Vec<AspectListItem>,
    /// Entity filter echoed back.
    pub entity: Option<String>,
    /// Schema filter echoed back.
    pub schema: Option<String>,
    /// Content path echoed back.
    pub aspect_path: Option<String>,
    /// Listing time echoed back (date-time).
    pub at_time: Option<String>,
    /// Pagination links.
    pub links: Links,
}

/// Identifier of a created aspect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AspectIdResult {
    /// Identifier (URI).
    pub id: String,
}
