//! Server half of the codec.
//!
//! A [`Handler`] turns a buffered request into a buffered response. The
//! per-service handlers (see [`crate::aspect::AspectHandler`] and
//! [`crate::secret::SecretHandler`]) are built from the helpers here: route
//! matching, query and body decoding, bearer extraction, and encoding of
//! results and typed errors.
//!
//! [`Loopback`] exposes any handler as an [`HttpClient`], so the typed
//! clients can talk to a server codec in-process.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use kestrel_core::{
    ContentType, Method, PathParams, PathTemplate, Projection, ServiceError, StatusCode,
    VIEW_HEADER, Viewed,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::security::{Authenticator, Context, JwtScheme};
use crate::{HttpClient, Request, Response, Result};

/// Response header carrying the kind tag of a typed error.
pub const ERROR_NAME_HEADER: &str = "x-error-name";

/// Answers buffered requests.
pub trait Handler: Send + Sync {
    /// Handle one request. Every failure is encoded in the response.
    fn handle(&self, request: Request<Bytes>) -> impl Future<Output = Response<Bytes>> + Send;
}

/// An in-process [`HttpClient`] backed by a [`Handler`].
#[derive(Debug, Clone)]
pub struct Loopback<H> {
    handler: H,
}

impl<H: Handler> Loopback<H> {
    /// Wrap `handler`.
    #[must_use]
    pub const fn new(handler: H) -> Self {
        Self { handler }
    }

    /// The wrapped handler.
    #[must_use]
    pub const fn handler(&self) -> &H {
        &self.handler
    }
}

impl<H: Handler> HttpClient for Loopback<H> {
    async fn execute(&self, request: Request<Bytes>) -> Result<Response<Bytes>> {
        Ok(self.handler.handle(request).await)
    }
}

/// A method and path template one operation answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    method: Method,
    template: PathTemplate,
}

impl Route {
    /// Declare a route.
    #[must_use]
    pub const fn new(method: Method, template: PathTemplate) -> Self {
        Self { method, template }
    }

    /// The path template.
    #[must_use]
    pub const fn template(&self) -> PathTemplate {
        self.template
    }

    /// The captured path parameters when `request` targets this route.
    #[must_use]
    pub fn matches(&self, request: &Request<Bytes>) -> Option<PathParams> {
        if request.method() != self.method {
            return None;
        }
        self.template.matches(request.url().path())
    }
}

/// The `400 bad-request` answer to an undecodable or invalid request.
#[must_use]
pub fn bad_request(cause: impl Display) -> ServiceError {
    ServiceError::bad_request(cause.to_string())
}

/// Decode the query string of `request`.
///
/// # Errors
///
/// Returns a `bad-request` error when a parameter does not parse.
pub fn decode_query<T: DeserializeOwned>(
    request: &Request<Bytes>,
) -> std::result::Result<T, ServiceError> {
    let query = request.url().query().unwrap_or_default();
    kestrel_core::from_query_string(query).map_err(bad_request)
}

/// Decode the JSON body of `request`.
///
/// # Errors
///
/// Returns a `bad-request` error when the body is missing or malformed.
pub fn decode_json<T: DeserializeOwned>(
    request: &Request<Bytes>,
) -> std::result::Result<T, ServiceError> {
    let body = request.body().map_or(&b""[..], |body| &body[..]);
    kestrel_core::from_json(body).map_err(bad_request)
}

/// The bearer token of `request`, scheme stripped.
///
/// # Errors
///
/// Returns `not-authorized` when the request carries no credentials.
pub fn bearer_token(request: &Request<Bytes>) -> std::result::Result<String, ServiceError> {
    request
        .header(kestrel_core::AUTHORIZATION)
        .map(kestrel_core::strip_scheme)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or(ServiceError::NotAuthorized)
}

/// Run the authentication callback for one operation.
///
/// # Errors
///
/// Returns the callback's refusal.
pub fn authenticate(
    auth: &impl Authenticator,
    token: &str,
    scheme: &JwtScheme,
) -> std::result::Result<Context, ServiceError> {
    auth.authenticate(Context::new(), token, scheme)
        .inspect_err(|error| {
            warn!(scheme = scheme.name, kind = error.kind(), "authentication refused");
        })
}

/// Encode a typed error: its canonical status, its body and its kind tag.
#[must_use]
pub fn encode_error(error: &ServiceError) -> Response<Bytes> {
    let status = error.status().as_u16();
    let response = match error.encode_body() {
        Ok(Some(body)) => json_response(status, body),
        Ok(None) => Response::empty(status),
        Err(err) => {
            warn!(error = %err, kind = error.kind(), "error body encoding failed");
            Response::empty(status)
        }
    };
    response.with_header(ERROR_NAME_HEADER, error.kind())
}

/// Encode a JSON body under `status`.
#[must_use]
pub fn encode_json<T: Serialize>(status: StatusCode, value: &T) -> Response<Bytes> {
    match kestrel_core::to_json(value) {
        Ok(body) => json_response(status.as_u16(), body),
        Err(err) => internal_error(&err),
    }
}

/// Encode a result projected into the requested view (`None` = default),
/// naming the view in the `x-view` header.
///
/// A result missing an attribute its view makes mandatory is a server-side
/// defect: it is answered with a bare `500` and never reaches the wire.
#[must_use]
pub fn encode_viewed<P>(full: &P::Full, view: Option<&str>) -> Response<Bytes>
where
    P: Projection + Serialize,
{
    let viewed = match Viewed::<P>::project(full, view) {
        Ok(viewed) => viewed,
        Err(err) => return encode_error(&bad_request(err)),
    };
    if let Err(errors) = viewed.validate() {
        return internal_error(&errors);
    }
    encode_json(StatusCode::OK, &viewed.projected).with_header(VIEW_HEADER, viewed.view)
}

/// The `204 No Content` answer.
#[must_use]
pub fn no_content() -> Response<Bytes> {
    Response::empty(StatusCode::NO_CONTENT.as_u16())
}

/// Turn the outcome of one operation into its response.
#[must_use]
pub fn finish(result: std::result::Result<Response<Bytes>, ServiceError>) -> Response<Bytes> {
    result.unwrap_or_else(|error| {
        debug!(kind = error.kind(), "answering with service error");
        encode_error(&error)
    })
}

/// The answer to a request no route matches.
#[must_use]
pub fn no_route(request: &Request<Bytes>) -> Response<Bytes> {
    warn!(http.method = %request.method(), path = request.url().path(), "no route");
    Response::empty(StatusCode::NOT_FOUND.as_u16())
}

fn json_response(status: u16, body: Bytes) -> Response<Bytes> {
    Response::new(status, HashMap::new(), body)
        .with_header("content-type", ContentType::Json.as_str())
}

fn internal_error(cause: &dyn Display) -> Response<Bytes> {
    warn!(error = %cause, "result encoding failed");
    let status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
    Response::new(status, HashMap::new(), Bytes::from(cause.to_string()))
        .with_header("content-type", ContentType::PlainText.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(method: Method, url: &str) -> Request<Bytes> {
        Request::builder(method, url::Url::parse(url).expect("url")).build()
    }

    #[test]
    fn route_matches_method_and_path() {
        let route = Route::new(Method::Delete, PathTemplate::new("/1/aspects/{id}"));
        let params = route
            .matches(&request(Method::Delete, "http://localhost/1/aspects/a-1"))
            .expect("match");
        assert_eq!(params.get("id"), Some("a-1"));
        assert!(route
            .matches(&request(Method::Get, "http://localhost/1/aspects/a-1"))
            .is_none());
    }

    #[test]
    fn bearer_token_strips_scheme() {
        let url = url::Url::parse("http://localhost/1/secrets").expect("url");
        let request = Request::builder(Method::Get, url.clone())
            .bearer_auth("abc")
            .build();
        assert_eq!(bearer_token(&request), Ok("abc".to_string()));

        let request = Request::<Bytes>::builder(Method::Get, url).build();
        assert_eq!(bearer_token(&request), Err(ServiceError::NotAuthorized));
    }

    #[test]
    fn encode_error_writes_status_body_and_name() {
        let response = encode_error(&ServiceError::not_found("a-1", "no such aspect"));
        assert_eq!(response.status(), 404);
        assert_eq!(response.header(ERROR_NAME_HEADER), Some("not-found"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        insta::assert_snapshot!(response.text_lossy(), @r#"{"id":"a-1","message":"no such aspect"}"#);

        let response = encode_error(&ServiceError::NotAvailable);
        assert_eq!(response.status(), 503);
        assert!(response.body().is_empty());
        assert_eq!(response.header("content-type"), None);
    }

    #[test]
    fn decode_query_failure_is_bad_request() {
        #[derive(Debug, serde::Deserialize)]
        struct Params {
            #[allow(dead_code)]
            limit: i64,
        }

        let request = request(Method::Get, "http://localhost/1/aspects?limit=many");
        let error = decode_query::<Params>(&request).expect_err("bad limit");
        assert_eq!(error.kind(), "bad-request");
    }
}
