//! Core codec types for kestrel REST clients and servers.
//!
//! This crate provides the building blocks the generated service layers
//! are made of:
//! - [`Request`] and [`RequestBuilder`] - HTTP request types, with the
//!   bearer rule in [`RequestBuilder::bearer_auth`]
//! - [`Response`] - buffered HTTP response type
//! - [`HttpClient`] - the transport seam
//! - [`dispatch`] - status-code dispatch tables for response decoding
//! - [`Validator`] and [`Validate`] - accumulating field validation with
//!   URI, date-time and UUID format checks
//! - [`ViewSet`], [`Projection`] and [`Viewed`] - named view projections
//! - [`ServiceError`] - the closed taxonomy of typed service errors
//! - [`Error`] and [`Result`] - error handling
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)

mod auth;
mod body;
mod client;
pub mod dispatch;
mod endpoint;
mod error;
mod method;
mod path_template;
pub mod prelude;
mod request;
mod response;
pub mod service_error;
mod validate;
mod view;

pub use auth::{AUTHORIZATION, authorization_value, strip_scheme};
pub use body::{ContentType, from_json, from_query_string, to_json, to_query_string};
pub use client::HttpClient;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use method::Method;
pub use path_template::{PathParams, PathTemplate};
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use service_error::ServiceError;
pub use validate::{Format, Validate, ValidationError, ValidationErrors, Validator};
pub use view::{DEFAULT_VIEW, Projection, VIEW_HEADER, View, ViewSet, Viewed};

// Re-export http crate types for status codes and headers
pub use http::{StatusCode, header};
