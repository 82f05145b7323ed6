//! Typed REST codec for the aspect and secret services.
//!
//! Each service module pairs the two halves of the wire contract:
//! - a typed client ([`aspect::AspectClient`], [`secret::SecretClient`])
//!   built from per-endpoint request encoders and status dispatch tables
//! - a server handler ([`aspect::AspectHandler`], [`secret::SecretHandler`])
//!   decoding requests for a service implementation and encoding its results
//!   in the requested view
//!
//! plus command-line payload builders. [`HyperClient`] is the network
//! transport; [`Loopback`] runs a handler in-process.
//!
//! # Example
//!
//! ```no_run
//! use kestrel::prelude::*;
//! use kestrel::secret::{ListSecretsPayload, SecretClient};
//!
//! # async fn run() -> kestrel::Result<()> {
//! let api = ApiClient::new(HyperClient::new(), "http://localhost:8080")?;
//! let secrets = SecretClient::new(api);
//! let page = secrets
//!     .list(&ListSecretsPayload {
//!         jwt: "secret-token".to_string(),
//!         ..ListSecretsPayload::default()
//!     })
//!     .await?;
//! println!("{} secrets, self = {}", page.items.len(), page.links.self_link);
//! # Ok(())
//! # }
//! ```

mod api_client;
pub mod aspect;
pub mod cli;
mod client;
mod codec;
mod config;
pub mod links;
pub mod prelude;
pub mod secret;
pub mod security;
pub mod server;

pub use api_client::ApiClient;
pub use client::{HyperClient, HyperClientBuilder};
pub use config::{ClientConfig, ClientConfigBuilder};
pub use security::{Authenticator, Context, JwtScheme};
pub use server::{Handler, Loopback};

// Re-export core types
pub use kestrel_core::{
    ContentType, Endpoint, Error, Format, HttpClient, Method, Projection, Request,
    RequestBuilder, Response, Result, ServiceError, Validate, ValidationError, ValidationErrors,
    View, ViewSet, Viewed, dispatch, from_json, to_json,
};

// Re-export http types for status codes and headers
pub use kestrel_core::{StatusCode, header};

pub use url;
