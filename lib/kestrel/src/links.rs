//! Pagination links of list results.

use kestrel_core::{Format, Validate, ValidationErrors, Validator};
use serde::{Deserialize, Serialize};

/// Navigation links of a list result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    /// The page that was returned.
    pub self_link: String,
    /// The first page.
    pub first: Option<String>,
    /// The next page, absent on the last one.
    pub next: Option<String>,
}

impl Links {
    /// Links of a page with no successor.
    #[must_use]
    pub fn single(self_link: impl Into<String>) -> Self {
        Self {
            self_link: self_link.into(),
            first: None,
            next: None,
        }
    }
}

/// Wire shape of [`Links`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinksBody {
    /// The page that was returned.
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<String>,
    /// The first page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// The next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

impl Validate for LinksBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("Links");
        v.require("self", self.self_link.as_ref())
            .format("self", self.self_link.as_deref(), Format::Uri)
            .format("first", self.first.as_deref(), Format::Uri)
            .format("next", self.next.as_deref(), Format::Uri);
        v.finish()
    }
}

impl From<&Links> for LinksBody {
    fn from(links: &Links) -> Self {
        Self {
            self_link: Some(links.self_link.clone()),
            first: links.first.clone(),
            next: links.next.clone(),
        }
    }
}

impl From<LinksBody> for Links {
    fn from(body: LinksBody) -> Self {
        Self {
            self_link: body.self_link.unwrap_or_default(),
            first: body.first,
            next: body.next,
        }
    }
}
