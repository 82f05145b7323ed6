//! Command-line payload builders of the aspect service.

use bytes::Bytes;
use kestrel_core::ContentType;

use super::{
    CREATE, CreateAspectPayload, DEFAULT_LIMIT, LIST, ListAspectsPayload, READ,
    ReadAspectPayload, RETRACT, RetractAspectPayload,
};
use crate::Result;
use crate::cli::{json, optional, optional_bool, optional_i64, required};
use crate::codec::validate;

/// Raw flags of `aspect list`.
#[derive(Debug, Clone, Default)]
pub struct ListFlags {
    /// `--entity`
    pub entity: String,
    /// `--schema`
    pub schema: String,
    /// `--content-path`
    pub content_path: String,
    /// `--at-time`
    pub at_time: String,
    /// `--limit`
    pub limit: String,
    /// `--filter`
    pub filter: String,
    /// `--order-by`
    pub order_by: String,
    /// `--order-desc`
    pub order_desc: String,
    /// `--include-content`
    pub include_content: String,
    /// `--page`
    pub page: String,
    /// `--jwt`
    pub jwt: String,
}

impl ListFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// [`crate::Error::InvalidFlag`] for an unparsable flag,
    /// [`crate::Error::Validation`] for a constraint violation.
    pub fn build(&self) -> Result<ListAspectsPayload> {
        let payload = ListAspectsPayload {
            entity: optional(&self.entity),
            schema: optional(&self.schema),
            content_path: optional(&self.content_path),
            at_time: optional(&self.at_time),
            limit: optional_i64("--limit", &self.limit)?.unwrap_or(DEFAULT_LIMIT),
            filter: optional(&self.filter),
            order_by: optional(&self.order_by),
            order_desc: optional_bool("--order-desc", &self.order_desc)?.unwrap_or_default(),
            include_content: optional_bool("--include-content", &self.include_content)?,
            page: optional(&self.page),
            jwt: self.jwt.clone(),
        };
        validate(LIST, &payload)?;
        Ok(payload)
    }
}

/// Raw flags of `aspect read`.
#[derive(Debug, Clone, Default)]
pub struct ReadFlags {
    /// `--id`
    pub id: String,
    /// `--view`
    pub view: String,
    /// `--jwt`
    pub jwt: String,
}

impl ReadFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// See [`ListFlags::build`].
    pub fn build(&self) -> Result<ReadAspectPayload> {
        let payload = ReadAspectPayload {
            id: required("--id", &self.id)?,
            view: optional(&self.view),
            jwt: self.jwt.clone(),
        };
        validate(READ, &payload)?;
        Ok(payload)
    }
}

/// Raw flags of `aspect create`.
///
/// `body` is the content; a JSON content type (the default) requires it to
/// be a JSON document.
#[derive(Debug, Clone, Default)]
pub struct CreateFlags {
    /// `--body`
    pub body: String,
    /// `--entity`
    pub entity: String,
    /// `--schema`
    pub schema: String,
    /// `--policy`
    pub policy: String,
    /// `--content-type`
    pub content_type: String,
    /// `--jwt`
    pub jwt: String,
}

impl CreateFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// See [`ListFlags::build`].
    pub fn build(&self) -> Result<CreateAspectPayload> {
        let content_type =
            optional(&self.content_type).unwrap_or_else(|| ContentType::Json.as_str().to_string());
        if ContentType::Json.matches(&content_type) {
            json::<serde_json::Value>("--body", &self.body)?;
        }
        let payload = CreateAspectPayload {
            entity: required("--entity", &self.entity)?,
            schema: required("--schema", &self.schema)?,
            policy: optional(&self.policy),
            content_type,
            content: Bytes::from(self.body.clone()),
            jwt: self.jwt.clone(),
        };
        validate(CREATE, &payload)?;
        Ok(payload)
    }
}

/// Raw flags of `aspect retract`.
#[derive(Debug, Clone, Default)]
pub struct RetractFlags {
    /// `--id`
    pub id: String,
    /// `--jwt`
    pub jwt: String,
}

impl RetractFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// See [`ListFlags::build`].
    pub fn build(&self) -> Result<RetractAspectPayload> {
        let payload = RetractAspectPayload {
            id: required("--id", &self.id)?,
            jwt: self.jwt.clone(),
        };
        validate(RETRACT, &payload)?;
        Ok(payload)
    }
}
