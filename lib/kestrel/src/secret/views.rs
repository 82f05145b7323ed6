//! View declarations and projected shapes of the secret results.

use kestrel_core::{Projection, Validate, ValidationErrors, Validator, View, ViewSet};
use serde::{Deserialize, Serialize};

use super::types::{SecretListItem, SecretListResult, SecretResult};
use crate::links::LinksBody;

const SECRET_VIEW_LIST: &[View] = &[
    View::new(
        "default",
        &["secret-name", "secret-value", "expiry-time"],
        &["secret-name", "secret-value", "expiry-time"],
    ),
    View::new("name-only", &["secret-name"], &["secret-name"]),
];

/// Views of [`SecretResult`]: `default` and `name-only`.
pub static SECRET_VIEWS: ViewSet = ViewSet::new("SecretResult", SECRET_VIEW_LIST);

const SECRET_LIST_VIEW_LIST: &[View] =
    &[View::new("default", &["items", "links"], &["items", "links"])];

/// Views of [`SecretListResult`].
pub static SECRET_LIST_VIEWS: ViewSet = ViewSet::new("SecretListResult", SECRET_LIST_VIEW_LIST);

/// [`SecretResult`] projected into one of its views.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecretResultView {
    /// `secret-name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    /// `secret-value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_value: Option<String>,
    /// `expiry-time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<i64>,
}

impl Projection for SecretResultView {
    type Full = SecretResult;
    const VIEWS: &'static ViewSet = &SECRET_VIEWS;

    fn project(full: &SecretResult, view: &View) -> Self {
        Self {
            secret_name: view.carry("secret-name", &full.secret_name),
            secret_value: view.carry_optional("secret-value", full.secret_value.as_ref()),
            expiry_time: view.carry_optional("expiry-time", full.expiry_time.as_ref()),
        }
    }

    fn unproject(self) -> SecretResult {
        SecretResult {
            secret_name: self.secret_name.unwrap_or_default(),
            secret_value: self.secret_value,
            expiry_time: self.expiry_time,
        }
    }

    fn is_present(&self, attribute: &str) -> bool {
        match attribute {
            "secret-name" => self.secret_name.is_some(),
            "secret-value" => self.secret_value.is_some(),
            "expiry-time" => self.expiry_time.is_some(),
            _ => false,
        }
    }
}

/// Wire shape of [`SecretListItem`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SecretListItemBody {
    /// `secret-name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_name: Option<String>,
    /// `expiry-time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_time: Option<i64>,
}

impl Validate for SecretListItemBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("SecretListItem");
        v.require("secret-name", self.secret_name.as_ref())
            .require("expiry-time", self.expiry_time.as_ref());
        v.finish()
    }
}

/// [`SecretListResult`] in its default view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretListResultView {
    /// `items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SecretListItemBody>>,
    /// `links`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksBody>,
}

impl Projection for SecretListResultView {
    type Full = SecretListResult;
    const VIEWS: &'static ViewSet = &SECRET_LIST_VIEWS;

    fn project(full: &SecretListResult, view: &View) -> Self {
        let items = full
            .items
            .iter()
            .map(|item| SecretListItemBody {
                secret_name: Some(item.secret_name.clone()),
                expiry_time: Some(item.expiry_time),
            })
            .collect();
        Self {
            items: view.includes("items").then_some(items),
            links: view.includes("links").then(|| LinksBody::from(&full.links)),
        }
    }

    fn unproject(self) -> SecretListResult {
        SecretListResult {
            items: self
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|item| SecretListItem {
                    secret_name: item.secret_name.unwrap_or_default(),
                    expiry_time: item.expiry_time.unwrap_or_default(),
                })
                .collect(),
            links: self.links.unwrap_or_default().into(),
        }
    }

    fn is_present(&self, attribute: &str) -> bool {
        match attribute {
            "items" => self.items.is_some(),
            "links" => self.links.is_some(),
            _ => false,
        }
    }

    fn validate_attributes(&self, v: &mut Validator) {
        v.each("items", self.items.as_deref().unwrap_or_default())
            .nested("links", self.links.as_ref());
    }
}
