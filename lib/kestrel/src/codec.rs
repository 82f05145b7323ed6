//! Helpers shared by the per-endpoint request encoders.

use std::any::Any;

use bytes::Bytes;
use kestrel_core::{Endpoint, Method, PathTemplate, RequestBuilder, Validate};
use url::Url;

use crate::{Error, Request, Result};

/// Recover the concrete payload an encoder was called with.
///
/// # Errors
///
/// Returns [`Error::InvalidPayload`] when `payload` is not a `T`.
pub fn downcast<T: 'static>(endpoint: Endpoint, payload: &dyn Any) -> Result<&T> {
    payload
        .downcast_ref::<T>()
        .ok_or_else(|| Error::invalid_payload(endpoint, std::any::type_name::<T>()))
}

/// Validate an outbound payload.
///
/// # Errors
///
/// Returns [`Error::Validation`] carrying every violation.
pub fn validate(endpoint: Endpoint, payload: &impl Validate) -> Result<()> {
    payload
        .validate()
        .map_err(|errors| Error::validation(endpoint, errors))
}

/// Start a request to `template` rendered under `base_url`.
///
/// The base URL path is kept as a prefix, with or without its trailing slash.
///
/// # Errors
///
/// Returns [`Error::InvalidRequest`] if a path parameter is missing.
pub fn request(
    base_url: &Url,
    method: Method,
    template: PathTemplate,
    params: &[(&str, &str)],
) -> Result<RequestBuilder<Bytes>> {
    let path = template.render(params)?;
    let mut url = base_url.clone();
    url.set_path(&format!("{}{path}", base_url.path().trim_end_matches('/')));
    url.set_query(None);
    Ok(Request::builder(method, url))
}

/// Attach the payload credential with the bearer rule.
///
/// An empty `jwt` sends no `Authorization` header at all.
#[must_use]
pub fn authorize(builder: RequestBuilder<Bytes>, jwt: &str) -> RequestBuilder<Bytes> {
    if jwt.is_empty() {
        builder
    } else {
        builder.bearer_auth(jwt)
    }
}
