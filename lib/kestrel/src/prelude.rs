//! Prelude module for convenient imports.
//!
//! ```
//! use kestrel::prelude::*;
//! ```

pub use crate::{
    ApiClient, Authenticator, ClientConfig, Context, Error, Handler, HttpClient, HyperClient,
    JwtScheme, Loopback, Method, Request, Response, Result, ServiceError, StatusCode, Validate,
};
