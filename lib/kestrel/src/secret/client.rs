//! Client half of the secret codec.

use std::any::Any;

use bytes::Bytes;
use kestrel_core::dispatch::{
    Branch, ResponseTable, ViewedBody, no_content, not_authorized, not_available,
};
use kestrel_core::service_error::{
    BadRequestBody, InvalidParameterBody, InvalidScopesBody, NotFoundBody, NotImplementedBody,
};
use kestrel_core::{Method, StatusCode};
use url::Url;

use super::types::GetQuery;
use super::{
    COLLECTION, GET, GetSecretPayload, LIST, ListSecretsPayload, MEMBER, SET, SecretListResult,
    SecretListResultView, SecretResult, SecretResultView, SetSecretBody, SetSecretPayload,
};
use crate::codec::{authorize, downcast, request, validate};
use crate::{ApiClient, HttpClient, Request, Response, Result};

const LIST_BRANCHES: &[Branch<SecretListResult>] = &[
    Branch::body::<ViewedBody<SecretListResultView>>(StatusCode::OK),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<InvalidParameterBody>(StatusCode::UNPROCESSABLE_ENTITY),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static LIST_RESPONSES: ResponseTable<SecretListResult> = ResponseTable::new(LIST, LIST_BRANCHES);

const GET_BRANCHES: &[Branch<SecretResult>] = &[
    Branch::body::<ViewedBody<SecretResultView>>(StatusCode::OK),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<NotFoundBody>(StatusCode::NOT_FOUND),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static GET_RESPONSES: ResponseTable<SecretResult> = ResponseTable::new(GET, GET_BRANCHES);

const SET_BRANCHES: &[Branch<()>] = &[
    Branch::empty(StatusCode::NO_CONTENT, no_content),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<InvalidParameterBody>(StatusCode::UNPROCESSABLE_ENTITY),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static SET_RESPONSES: ResponseTable<()> = ResponseTable::new(SET, SET_BRANCHES);

/// Encode a [`ListSecretsPayload`] into a `GET /1/secrets` request.
///
/// # Errors
///
/// - [`crate::Error::InvalidPayload`] when `payload` has another type
/// - [`crate::Error::Validation`] when the payload breaks its constraints
pub fn encode_list(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<ListSecretsPayload>(LIST, payload)?;
    validate(LIST, payload)?;
    let query = kestrel_core::to_query_string(payload)?;
    let builder = request(base_url, Method::Get, COLLECTION, &[])?.raw_query(&query);
    Ok(authorize(builder, &payload.jwt).build())
}

/// Encode a [`GetSecretPayload`] into a `GET /1/secrets/{name}` request.
///
/// # Errors
///
/// See [`encode_list`].
pub fn encode_get(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<GetSecretPayload>(GET, payload)?;
    validate(GET, payload)?;
    let query = kestrel_core::to_query_string(&GetQuery {
        secret_type: payload.secret_type.clone(),
        view: payload.view.clone(),
    })?;
    let builder =
        request(base_url, Method::Get, MEMBER, &[("name", &payload.name)])?.raw_query(&query);
    Ok(authorize(builder, &payload.jwt).build())
}

/// Encode a [`SetSecretPayload`] into a `POST /1/secrets` request with the
/// descriptor flattened into the JSON body.
///
/// # Errors
///
/// See [`encode_list`].
pub fn encode_set(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<SetSecretPayload>(SET, payload)?;
    validate(SET, payload)?;
    let builder = request(base_url, Method::Post, COLLECTION, &[])?
        .json(&SetSecretBody::from(&payload.secret))?;
    Ok(authorize(builder, &payload.jwt).build())
}

/// Decode the response of `list`.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_list(response: &Response) -> Result<SecretListResult> {
    LIST_RESPONSES.decode(response)
}

/// Decode the response of `get`, honoring the `x-view` header.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_get(response: &Response) -> Result<SecretResult> {
    GET_RESPONSES.decode(response)
}

/// Decode the response of `set`.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_set(response: &Response) -> Result<()> {
    SET_RESPONSES.decode(response)
}

/// Typed client of the secret service.
#[derive(Debug, Clone)]
pub struct SecretClient<C> {
    api: ApiClient<C>,
}

impl<C> SecretClient<C> {
    /// Wrap an [`ApiClient`].
    #[must_use]
    pub const fn new(api: ApiClient<C>) -> Self {
        Self { api }
    }

    /// The underlying [`ApiClient`].
    #[must_use]
    pub const fn api(&self) -> &ApiClient<C> {
        &self.api
    }
}

impl<C: HttpClient> SecretClient<C> {
    /// `GET /1/secrets`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn list(&self, payload: &ListSecretsPayload) -> Result<SecretListResult> {
        let request = encode_list(self.api.base_url(), payload)?;
        self.api.call(&LIST_RESPONSES, request).await
    }

    /// `GET /1/secrets/{name}`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn get(&self, payload: &GetSecretPayload) -> Result<SecretResult> {
        let request = encode_get(self.api.base_url(), payload)?;
        self.api.call(&GET_RESPONSES, request).await
    }

    /// `POST /1/secrets`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn set(&self, payload: &SetSecretPayload) -> Result<()> {
        let request = encode_set(self.api.base_url(), payload)?;
        self.api.call(&SET_RESPONSES, request).await
    }
}
