//! The aspect service: schema-typed statements about entities.
//!
//! | operation | route | success |
//! |---|---|---|
//! | `list` | `GET /1/aspects` | `200` [`AspectListResult`] |
//! | `read` | `GET /1/aspects/{id}` | `200` [`AspectRT`] in the requested view |
//! | `create` | `POST /1/aspects` | `200` [`AspectIdResult`] |
//! | `retract` | `DELETE /1/aspects/{id}` | `204` |

use std::future::Future;

use kestrel_core::{Endpoint, PathTemplate, ServiceError};

use crate::security::{Context, JwtScheme};

mod cli;
mod client;
mod server;
mod types;
mod views;

pub use cli::{CreateFlags, ListFlags, ReadFlags, RetractFlags};
pub use client::{
    AspectClient, decode_create, decode_list, decode_read, decode_retract, encode_create,
    encode_list, encode_read, encode_retract,
};
pub use server::AspectHandler;
pub use types::{
    AspectIdResult, AspectListItem, AspectListResult, AspectRT, CreateAspectPayload,
    DEFAULT_LIMIT, ListAspectsPayload, MAX_LIMIT, ReadAspectPayload, RetractAspectPayload,
};
pub use views::{
    ASPECT_ID_VIEWS, ASPECT_LIST_VIEWS, ASPECT_VIEWS, AspectIdResultView, AspectListItemBody,
    AspectListResultView, AspectRTView,
};

/// `aspect.list`
pub const LIST: Endpoint = Endpoint::new("aspect", "list");
/// `aspect.read`
pub const READ: Endpoint = Endpoint::new("aspect", "read");
/// `aspect.create`
pub const CREATE: Endpoint = Endpoint::new("aspect", "create");
/// `aspect.retract`
pub const RETRACT: Endpoint = Endpoint::new("aspect", "retract");

const COLLECTION: PathTemplate = PathTemplate::new("/1/aspects");
const MEMBER: PathTemplate = PathTemplate::new("/1/aspects/{id}");

const SCOPES: &[&str] = &["aspect:read", "aspect:write"];

/// Security requirement of `list` and `read`.
pub const READ_SCHEME: JwtScheme = JwtScheme {
    name: "jwt",
    scopes: SCOPES,
    required_scopes: &["aspect:read"],
};

/// Security requirement of `create` and `retract`.
pub const WRITE_SCHEME: JwtScheme = JwtScheme {
    name: "jwt",
    scopes: SCOPES,
    required_scopes: &["aspect:write"],
};

/// The aspect service implementation behind an [`AspectHandler`].
///
/// The `jwt` of each payload has already been verified by the handler's
/// authenticator; `context` carries whatever it recorded.
pub trait AspectService: Send + Sync {
    /// One page of aspects.
    fn list(
        &self,
        context: &Context,
        payload: ListAspectsPayload,
    ) -> impl Future<Output = Result<AspectListResult, ServiceError>> + Send;

    /// A single aspect.
    fn read(
        &self,
        context: &Context,
        payload: ReadAspectPayload,
    ) -> impl Future<Output = Result<AspectRT, ServiceError>> + Send;

    /// Record a new aspect.
    fn create(
        &self,
        context: &Context,
        payload: CreateAspectPayload,
    ) -> impl Future<Output = Result<AspectIdResult, ServiceError>> + Send;

    /// Retract an aspect.
    fn retract(
        &self,
        context: &Context,
        payload: RetractAspectPayload,
    ) -> impl Future<Output = Result<(), ServiceError>> + Send;
}
