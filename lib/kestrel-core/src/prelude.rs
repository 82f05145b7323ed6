//! Prelude module for convenient imports.
//!
//! ```
//! use kestrel_core::prelude::*;
//! ```

pub use crate::dispatch::{Branch, Outcome, ResponseTable, ViewedBody, WireBody};
pub use crate::{
    ContentType, Endpoint, Error, Format, HttpClient, Method, PathTemplate, Projection, Request,
    RequestBuilder, Response, Result, ServiceError, StatusCode, Validate, ValidationError,
    ValidationErrors, Validator, View, ViewSet, Viewed,
};
