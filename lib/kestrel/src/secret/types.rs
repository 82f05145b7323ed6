//! Payloads and results of the secret service.

use kestrel_core::{Validate, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

use super::views::SECRET_VIEWS;
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
pub struct ListSecretsPayload {
    /// Opaque page token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Number of secrets to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Bearer credential.
    #[serde(skip)]
    pub jwt: String,
}

impl Default for ListSecretsPayload {
    fn default() -> Self {
        Self {
            page: None,
            filter: None,
            offset: None,
            limit: DEFAULT_LIMIT,
            jwt: String::new(),
        }
    }
}

impl Validate for ListSecretsPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("ListSecretsPayload");
        v.range("offset", self.offset, 0, i64::MAX)
            .range("limit", Some(self.limit), 1, MAX_LIMIT);
        v.finish()
    }
}

/// Payload of `get`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetSecretPayload {
    /// Secret name.
    pub name: String,
    /// Kind of secret to look up.
    pub secret_type: Option<String>,
    /// View to render the secret in; `None` selects `default`.
    pub view: Option<String>,
    /// Bearer credential.
    pub jwt: String,
}

impl Validate for GetSecretPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("GetSecretPayload");
        v.require_present("name", !self.name.is_empty()).one_of(
            "view",
            self.view.as_deref(),
            &SECRET_VIEWS.names(),
        );
        v.finish()
    }
}

/// A secret to store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretDescriptor {
    /// Secret name.
    pub secret_name: String,
    /// Kind of secret; omitted from the wire when absent.
    pub secret_type: Option<String>,
    /// Secret value.
    pub secret_value: String,
    /// Expiry as seconds since the epoch.
    pub expiry_time: i64,
}

/// Payload of `set`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetSecretPayload {
    /// The secret.
    pub secret: SecretDescriptor,
    /// Bearer credential.
    pub jwt: String,
}

impl Validate for SetSecretPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("SetSecretPayload");
        v.require_present("secret-name", !self.secret.secret_name.is_empty());
        v.finish()
    }
}

/// Body of `set`: the descriptor flattened into top-level fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SetSecretBody {
    /// `secret-name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    /// `secret-type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    /// `secret-value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_value: Option<String>,
    /// `expiry-time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<i64>,
}

impl Validate for SetSecretBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("SetSecretBody");
        v.require("secret-name", self.secret_name.as_ref())
            .require("secret-value", self.secret_value.as_ref())
            .require("expiry-time", self.expiry_time.as_ref());
        v.finish()
    }
}

impl From<&SecretDescriptor> for SetSecretBody {
    fn from(secret: &SecretDescriptor) -> Self {
        Self {
            secret_name: Some(secret.secret_name.clone()),
            secret_type: secret.secret_type.clone(),
            secret_value: Some(secret.secret_value.clone()),
            expiry_time: Some(secret.expiry_time),
        }
    }
}

impl From<SetSecretBody> for SecretDescriptor {
    fn from(body: SetSecretBody) -> Self {
        Self {
            secret_name: body.secret_name.unwrap_or_default(),
            secret_type: body.secret_type,
            secret_value: body.secret_value.unwrap_or_default(),
            expiry_time: body.expiry_time.unwrap_or_default(),
        }
    }
}

/// Query string of `get`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct GetQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

/// One entry of a `list` page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretListItem {
    /// Secret name.
    pub secret_name: String,
    /// Expiry as seconds since the epoch.
    pub expiry_time: i64,
}

/// One page of secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretListResult {
    /// The page.
    pub items: Vec<SecretListItem>,
    /// Pagination links.
    pub links: Links,
}

/// A stored secret. Attributes outside the rendered view are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretResult {
    /// Secret name.
    pub secret_name: String,
    /// Secret value.
    pub secret_value: Option<String>,
    /// Expiry as seconds since the epoch.
    pub expiry_time: Option<i64>,
}
