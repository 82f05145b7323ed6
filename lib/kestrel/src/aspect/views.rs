//! View declarations and projected shapes of the aspect results.
//!
//! Each projected type is also the success wire body of its endpoint.

use kestrel_core::{
    Format, Projection, Validate, ValidationErrors, Validator, View, ViewSet,
};
use serde::{Deserialize, Serialize};

use super::types::{AspectIdResult, AspectListItem, AspectListResult, AspectRT};
use crate::links::LinksBody;

const ASPECT_VIEW_LIST: &[View] = &[
    View::new(
        "default",
        &[
            "id",
            "entity",
            "schema",
            "content",
            "content-type",
            "valid-from",
            "valid-to",
            "asserter",
            "retracter",
        ],
        &[
            "id",
            "entity",
            "schema",
            "content",
            "content-type",
            "valid-from",
            "asserter",
        ],
    ),
    View::new("tiny", &["id", "entity", "schema"], &["id", "entity", "schema"]),
];

/// Views of [`AspectRT`]: `default` and `tiny`.
pub static ASPECT_VIEWS: ViewSet = ViewSet::new("AspectRT", ASPECT_VIEW_LIST);

const ASPECT_LIST_VIEW_LIST: &[View] = &[View::new(
    "default",
    &["items", "entity", "schema", "aspect-path", "at-time", "links"],
    &["items", "links"],
)];

/// Views of [`AspectListResult`].
pub static ASPECT_LIST_VIEWS: ViewSet = ViewSet::new("AspectListResult", ASPECT_LIST_VIEW_LIST);

const ASPECT_ID_VIEW_LIST: &[View] = &[View::new("default", &["id"], &["id"])];

/// Views of [`AspectIdResult`].
pub static ASPECT_ID_VIEWS: ViewSet = ViewSet::new("AspectIdResult", ASPECT_ID_VIEW_LIST);

/// [`AspectRT`] projected into one of its views.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AspectRTView {
    /// `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `entity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// `schema`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// `content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    /// `content-type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `valid-from`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<String>,
    /// `valid-to`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<String>,
    /// `asserter`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asserter: Option<String>,
    /// `retracter`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retracter: Option<String>,
}

impl Projection for AspectRTView {
    type Full = AspectRT;
    const VIEWS: &'static ViewSet = &ASPECT_VIEWS;

    fn project(full: &AspectRT, view: &View) -> Self {
        Self {
            id: view.carry("id", &full.id),
            entity: view.carry("entity", &full.entity),
            schema: view.carry("schema", &full.schema),
            content: view.carry_optional("content", full.content.as_ref()),
            content_type: view.carry_optional("content-type", full.content_type.as_ref()),
            valid_from: view.carry_optional("valid-from", full.valid_from.as_ref()),
            valid_to: view.carry_optional("valid-to", full.valid_to.as_ref()),
            asserter: view.carry_optional("asserter", full.asserter.as_ref()),
            retracter: view.carry_optional("retracter", full.retracter.as_ref()),
        }
    }

    fn unproject(self) -> AspectRT {
        AspectRT {
            id: self.id.unwrap_or_default(),
            entity: self.entity.unwrap_or_default(),
            schema: self.schema.unwrap_or_default(),
            content: self.content,
            content_type: self.content_type,
            valid_from: self.valid_from,
            valid_to: self.valid_to,
            asserter: self.asserter,
            retracter: self.retracter,
        }
    }

    fn is_present(&self, attribute: &str) -> bool {
        match attribute {
            "id" => self.id.is_some(),
            "entity" => self.entity.is_some(),
            "schema" => self.schema.is_some(),
            "content" => self.content.is_some(),
            "content-type" => self.content_type.is_some(),
            "valid-from" => self.valid_from.is_some(),
            "valid-to" => self.valid_to.is_some(),
            "asserter" => self.asserter.is_some(),
            "retracter" => self.retracter.is_some(),
            _ => false,
        }
    }

    fn validate_attributes(&self, v: &mut Validator) {
        v.format("id", self.id.as_deref(), Format::Uri)
            .format("entity", self.entity.as_deref(), Format::Uri)
            .format("valid-from", self.valid_from.as_deref(), Format::DateTime)
            .format("valid-to", self.valid_to.as_deref(), Format::DateTime);
    }
}

/// Wire shape of [`AspectListItem`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AspectListItemBody {
    /// `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `entity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// `schema`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// `content`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    /// `content-type`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl Validate for AspectListItemBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("AspectListItem");
        v.require("id", self.id.as_ref())
            .require("entity", self.entity.as_ref())
            .require("schema", self.schema.as_ref())
            .format("id", self.id.as_deref(), Format::Uri)
            .format("entity", self.entity.as_deref(), Format::Uri);
        v.finish()
    }
}

impl From<&AspectListItem> for AspectListItemBody {
    fn from(item: &AspectListItem) -> Self {
        Self {
            id: Some(item.id.clone()),
            entity: Some(item.entity.clone()),
            schema: Some(item.schema.clone()),
            content: item.content.clone(),
            content_type: item.content_type.clone(),
        }
    }
}

impl From<AspectListItemBody> for AspectListItem {
    fn from(body: AspectListItemBody) -> Self {
        Self {
            id: body.id.unwrap_or_default(),
            entity: body.entity.unwrap_or_default(),
            schema: body.schema.unwrap_or_default(),
            content: body.content,
            content_type: body.content_type,
        }
    }
}

/// [`AspectListResult`] in its default view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AspectListResultView {
    /// `items`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<AspectListItemBody>>,
    /// `entity`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    /// `schema`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// `aspect-path`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_path: Option<String>,
    /// `at-time`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub at_time: Option<String>,
    /// `links`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksBody>,
}

impl Projection for AspectListResultView {
    type Full = AspectListResult;
    const VIEWS: &'static ViewSet = &ASPECT_LIST_VIEWS;

    fn project(full: &AspectListResult, view: &View) -> Self {
        Self {
            items: view
                .includes("items")
                .then(|| full.items.iter().map(AspectListItemBody::from).collect()),
            entity: view.carry_optional("entity", full.entity.as_ref()),
            schema: view.carry_optional("schema", full.schema.as_ref()),
            aspect_path: view.carry_optional("aspect-path", full.aspect_path.as_ref()),
            at_time: view.carry_optional("at-time", full.at_time.as_ref()),
            links: view.includes("links").then(|| LinksBody::from(&full.links)),
        }
    }

    fn unproject(self) -> AspectListResult {
        AspectListResult {
            items: self
                .items
                .unwrap_or_default()
                .into_iter()
                .map(AspectListItem::from)
                .collect(),
            entity: self.entity,
            schema: self.schema,
            aspect_path: self.aspect_path,
            at_time: self.at_time,
            links: self.links.unwrap_or_default().into(),
        }
    }

    fn is_present(&self, attribute: &str) -> bool {
        match attribute {
            "items" => self.items.is_some(),
            "entity" => self.entity.is_some(),
            "schema" => self.schema.is_some(),
            "aspect-path" => self.aspect_path.is_some(),
            "at-time" => self.at_time.is_some(),
            "links" => self.links.is_some(),
            _ => false,
        }
    }

    fn validate_attributes(&self, v: &mut Validator) {
        v.each("items", self.items.as_deref().unwrap_or_default())
            .format("at-time", self.at_time.as_deref(), Format::DateTime)
            .nested("links", self.links.as_ref());
    }
}

/// [`AspectIdResult`] in its default view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectIdResultView {
    /// `id`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Projection for AspectIdResultView {
    type Full = AspectIdResult;
    const VIEWS: &'static ViewSet = &ASPECT_ID_VIEWS;

    fn project(full: &AspectIdResult, view: &View) -> Self {
        Self {
            id: view.carry("id", &full.id),
        }
    }

    fn unproject(self) -> AspectIdResult {
        AspectIdResult {
            id: self.id.unwrap_or_default(),
        }
    }

    fn is_present(&self, attribute: &str) -> bool {
        attribute == "id" && self.id.is_some()
    }

    fn validate_attributes(&self, v: &mut Validator) {
        v.format("id", self.id.as_deref(), Format::Uri);
    }
}
