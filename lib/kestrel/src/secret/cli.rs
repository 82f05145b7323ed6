//! Command-line payload builders of the secret service.

use super::{
    DEFAULT_LIMIT, GET, GetSecretPayload, LIST, ListSecretsPayload, SET, SetSecretBody,
    SetSecretPayload,
};
use crate::Result;
use crate::cli::{json, optional, optional_i64, required};
use crate::codec::validate;

/// Raw flags of `secret list`.
#[derive(Debug, Clone, Default)]
pub struct ListFlags {
    /// `--page`
    pub page: String,
    /// `--filter`
    pub filter: String,
    /// `--offset`
    pub offset: String,
    /// `--limit`
    pub limit: String,
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
    pub fn build(&self) -> Result<ListSecretsPayload> {
        let payload = ListSecretsPayload {
            page: optional(&self.page),
            filter: optional(&self.filter),
            offset: optional_i64("--offset", &self.offset)?,
            limit: optional_i64("--limit", &self.limit)?.unwrap_or(DEFAULT_LIMIT),
            jwt: self.jwt.clone(),
        };
        validate(LIST, &payload)?;
        Ok(payload)
    }
}

/// Raw flags of `secret get`.
#[derive(Debug, Clone, Default)]
pub struct GetFlags {
    /// `--name`
    pub name: String,
    /// `--secret-type`
    pub secret_type: String,
    /// `--view`
    pub view: String,
    /// `--jwt`
    pub jwt: String,
}

impl GetFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// See [`ListFlags::build`].
    pub fn build(&self) -> Result<GetSecretPayload> {
        let payload = GetSecretPayload {
            name: required("--name", &self.name)?,
            secret_type: optional(&self.secret_type),
            view: optional(&self.view),
            jwt: self.jwt.clone(),
        };
        validate(GET, &payload)?;
        Ok(payload)
    }
}

/// Raw flags of `secret set`; `body` is the JSON descriptor, e.g.
/// `{"secret-name":"db","secret-value":"hunter2","expiry-time":1700000000}`.
#[derive(Debug, Clone, Default)]
pub struct SetFlags {
    /// `--body`
    pub body: String,
    /// `--jwt`
    pub jwt: String,
}

impl SetFlags {
    /// Build and validate the payload.
    ///
    /// # Errors
    ///
    /// See [`ListFlags::build`].
    pub fn build(&self) -> Result<SetSecretPayload> {
        let body: SetSecretBody = json("--body", &self.body)?;
        validate(SET, &body)?;
        let payload = SetSecretPayload {
            secret: body.into(),
            jwt: self.jwt.clone(),
        };
        validate(SET, &payload)?;
        Ok(payload)
    }
}
