//! The secret service: named, expiring secrets.
//!
//! | operation | route | success |
//! |---|---|---|
//! | `list` | `GET /1/secrets` | `200` [`SecretListResult`] |
//! | `get` | `GET /1/secrets/{name}` | `200` [`SecretResult`] in the requested view |
//! | `set` | `POST /1/secrets` | `204` |

use std::future::Future;

use kestrel_core::{Endpoint, PathTemplate, ServiceError};

use crate::security::{Context, JwtScheme};

mod cli;
mod client;
mod server;
mod types;
mod views;

pub use cli::{GetFlags, ListFlags, SetFlags};
pub use client::{
    SecretClient, decode_get, decode_list, decode_set, encode_get, encode_list, encode_set,
};
pub use server::SecretHandler;
pub use types::{
    DEFAULT_LIMIT, GetSecretPayload, ListSecretsPayload, MAX_LIMIT, SecretDescriptor,
    SecretListItem, SecretListResult, SecretResult, SetSecretBody, SetSecretPayload,
};
pub use views::{
    SECRET_LIST_VIEWS, SECRET_VIEWS, SecretListItemBody, SecretListResultView, SecretResultView,
};

/// `secret.list`
pub const LIST: Endpoint = Endpoint::new("secret", "list");
/// `secret.get`
pub const GET: Endpoint = Endpoint::new("secret", "get");
/// `secret.set`
pub const SET: Endpoint = Endpoint::new("secret", "set");

const COLLECTION: PathTemplate = PathTemplate::new("/1/secrets");
const MEMBER: PathTemplate = PathTemplate::new("/1/secrets/{name}");

const SCOPES: &[&str] = &["secret:read", "secret:write"];

/// Security requirement of `list` and `get`.
pub const READ_SCHEME: JwtScheme = JwtScheme {
    name: "jwt",
    scopes: SCOPES,
    required_scopes: &["secret:read"],
};

/// Security requirement of `set`.
pub const WRITE_SCHEME: JwtScheme = JwtScheme {
    name: "jwt",
    scopes: SCOPES,
    required_scopes: &["secret:write"],
};

/// The secret service implementation behind a [`SecretHandler`].
pub trait SecretService: Send + Sync {
    /// One page of secret names.
    fn list(
        &self,
        context: &Context,
        payload: ListSecretsPayload,
    ) -> impl Future<Output = Result<SecretListResult, ServiceError>> + Send;

    /// A single secret.
    fn get(
        &self,
        context: &Context,
        payload: GetSecretPayload,
    ) -> impl Future<Output = Result<SecretResult, ServiceError>> + Send;

    /// Store a secret, replacing any secret of the same name.
    fn set(
        &self,
        context: &Context,
        payload: SetSecretPayload,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
