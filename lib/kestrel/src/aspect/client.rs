//! Client half of the aspect codec: request encoders, status tables and
//! the typed [`AspectClient`].

use std::any::Any;

use bytes::Bytes;
use kestrel_core::dispatch::{
    Branch, ResponseTable, ViewedBody, no_content, not_authorized, not_available,
};
use kestrel_core::service_error::{
    AlreadyCreatedBody, BadRequestBody, InvalidParameterBody, InvalidScopesBody,
    NotFoundBody, NotImplementedBody, UnsupportedContentTypeBody,
};
use kestrel_core::{Method, StatusCode};
use url::Url;

use super::types::{CreateQuery, ViewQuery};
use super::{
    AspectIdResult, AspectIdResultView, AspectListResult, AspectListResultView, AspectRT,
    AspectRTView, COLLECTION, CREATE, CreateAspectPayload, LIST, ListAspectsPayload, MEMBER,
    READ, RETRACT, ReadAspectPayload, RetractAspectPayload,
};
use crate::codec::{authorize, downcast, request, validate};
use crate::{ApiClient, HttpClient, Request, Response, Result};

const LIST_BRANCHES: &[Branch<AspectListResult>] = &[
    Branch::body::<ViewedBody<AspectListResultView>>(StatusCode::OK),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<InvalidParameterBody>(StatusCode::UNPROCESSABLE_ENTITY),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static LIST_RESPONSES: ResponseTable<AspectListResult> = ResponseTable::new(LIST, LIST_BRANCHES);

const READ_BRANCHES: &[Branch<AspectRT>] = &[
    Branch::body::<ViewedBody<AspectRTView>>(StatusCode::OK),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<NotFoundBody>(StatusCode::NOT_FOUND),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static READ_RESPONSES: ResponseTable<AspectRT> = ResponseTable::new(READ, READ_BRANCHES);

const CREATE_BRANCHES: &[Branch<AspectIdResult>] = &[
    Branch::body::<ViewedBody<AspectIdResultView>>(StatusCode::OK),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<AlreadyCreatedBody>(StatusCode::CONFLICT),
    Branch::body::<UnsupportedContentTypeBody>(StatusCode::UNSUPPORTED_MEDIA_TYPE),
    Branch::body::<InvalidParameterBody>(StatusCode::UNPROCESSABLE_ENTITY),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static CREATE_RESPONSES: ResponseTable<AspectIdResult> =
    ResponseTable::new(CREATE, CREATE_BRANCHES);

const RETRACT_BRANCHES: &[Branch<()>] = &[
    Branch::empty(StatusCode::NO_CONTENT, no_content),
    Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
    Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
    Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
    Branch::body::<NotFoundBody>(StatusCode::NOT_FOUND),
    Branch::body::<NotImplementedBody>(StatusCode::NOT_IMPLEMENTED),
    Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
];

static RETRACT_RESPONSES: ResponseTable<()> = ResponseTable::new(RETRACT, RETRACT_BRANCHES);

/// Encode a [`ListAspectsPayload`] into a `GET /1/aspects` request.
///
/// # Errors
///
/// - [`crate::Error::InvalidPayload`] when `payload` has another type
/// - [`crate::Error::Validation`] when the payload breaks its constraints
pub fn encode_list(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<ListAspectsPayload>(LIST, payload)?;
    validate(LIST, payload)?;
    let query = kestrel_core::to_query_string(payload)?;
    let builder = request(base_url, Method::Get, COLLECTION, &[])?.raw_query(&query);
    Ok(authorize(builder, &payload.jwt).build())
}

/// Encode a [`ReadAspectPayload`] into a `GET /1/aspects/{id}` request.
///
/// # Errors
///
/// See [`encode_list`].
pub fn encode_read(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<ReadAspectPayload>(READ, payload)?;
    validate(READ, payload)?;
    let query = kestrel_core::to_query_string(&ViewQuery {
        view: payload.view.clone(),
    })?;
    let builder = request(base_url, Method::Get, MEMBER, &[("id", &payload.id)])?.raw_query(&query);
    Ok(authorize(builder, &payload.jwt).build())
}

/// Encode a [`CreateAspectPayload`] into a `POST /1/aspects` request whose
/// body is the content itself.
///
/// # Errors
///
/// See [`encode_list`].
pub fn encode_create(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<CreateAspectPayload>(CREATE, payload)?;
    validate(CREATE, payload)?;
    let query = kestrel_core::to_query_string(&CreateQuery {
        entity: Some(payload.entity.clone()),
        schema: Some(payload.schema.clone()),
        policy: payload.policy.clone(),
    })?;
    let mut builder = request(base_url, Method::Post, COLLECTION, &[])?.raw_query(&query);
    if !payload.content_type.is_empty() {
        builder = builder.header("Content-Type", payload.content_type.as_str());
    }
    Ok(authorize(builder, &payload.jwt)
        .body(payload.content.clone())
        .build())
}

/// Encode a [`RetractAspectPayload`] into a `DELETE /1/aspects/{id}` request.
///
/// # Errors
///
/// See [`encode_list`].
pub fn encode_retract(base_url: &Url, payload: &dyn Any) -> Result<Request<Bytes>> {
    let payload = downcast::<RetractAspectPayload>(RETRACT, payload)?;
    validate(RETRACT, payload)?;
    let builder = request(base_url, Method::Delete, MEMBER, &[("id", &payload.id)])?;
    Ok(authorize(builder, &payload.jwt).build())
}

/// Decode the response of `list`.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_list(response: &Response) -> Result<AspectListResult> {
    LIST_RESPONSES.decode(response)
}

/// Decode the response of `read`, honoring the `x-view` header.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_read(response: &Response) -> Result<AspectRT> {
    READ_RESPONSES.decode(response)
}

/// Decode the response of `create`.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_create(response: &Response) -> Result<AspectIdResult> {
    CREATE_RESPONSES.decode(response)
}

/// Decode the response of `retract`.
///
/// # Errors
///
/// See [`ResponseTable::decode`].
pub fn decode_retract(response: &Response) -> Result<()> {
    RETRACT_RESPONSES.decode(response)
}

/// Typed client of the aspect service.
///
/// # Example
///
/// ```no_run
/// use kestrel::aspect::{AspectClient, ReadAspectPayload};
/// use kestrel::{ApiClient, HyperClient};
///
/// # async fn run() -> kestrel::Result<()> {
/// let api = ApiClient::new(HyperClient::new(), "http://localhost:8080")?;
/// let aspects = AspectClient::new(api);
/// let aspect = aspects
///     .read(&ReadAspectPayload {
///         id: "urn:kestrel:aspect:1".to_string(),
///         view: Some("tiny".to_string()),
///         jwt: "secret-token".to_string(),
///     })
///     .await?;
/// println!("{}", aspect.schema);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AspectClient<C> {
    api: ApiClient<C>,
}

impl<C> AspectClient<C> {
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

impl<C: HttpClient> AspectClient<C> {
    /// `GET /1/aspects`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn list(&self, payload: &ListAspectsPayload) -> Result<AspectListResult> {
        let request = encode_list(self.api.base_url(), payload)?;
        self.api.call(&LIST_RESPONSES, request).await
    }

    /// `GET /1/aspects/{id}`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn read(&self, payload: &ReadAspectPayload) -> Result<AspectRT> {
        let request = encode_read(self.api.base_url(), payload)?;
        self.api.call(&READ_RESPONSES, request).await
    }

    /// `POST /1/aspects`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn create(&self, payload: &CreateAspectPayload) -> Result<AspectIdResult> {
        let request = encode_create(self.api.base_url(), payload)?;
        self.api.call(&CREATE_RESPONSES, request).await
    }

    /// `DELETE /1/aspects/{id}`
    ///
    /// # Errors
    ///
    /// Any encoding, transport, decoding or service error.
    pub async fn retract(&self, payload: &RetractAspectPayload) -> Result<()> {
        let request = encode_retract(self.api.base_url(), payload)?;
        self.api.call(&RETRACT_RESPONSES, request).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::{check, let_assert};
    use kestrel_core::{ServiceError, VIEW_HEADER};

    use super::*;
    use crate::Error;

    fn base() -> Url {
        Url::parse("http://localhost:8080").expect("url")
    }

    fn response(status: u16, body: &'static str) -> Response {
        Response::new(status, HashMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn tables_cover_declared_statuses() {
        assert_eq!(LIST_RESPONSES.statuses(), vec![200, 400, 401, 403, 422, 501, 503]);
        assert_eq!(READ_RESPONSES.statuses(), vec![200, 400, 401, 403, 404, 501, 503]);
        assert_eq!(
            CREATE_RESPONSES.statuses(),
            vec![200, 400, 401, 403, 409, 415, 422, 501, 503]
        );
        assert_eq!(RETRACT_RESPONSES.statuses(), vec![204, 400, 401, 403, 404, 501, 503]);
    }

    #[test]
    fn list_request_carries_query_and_bearer() {
        let payload = ListAspectsPayload {
            schema: Some("urn:kestrel:schema:profile".to_string()),
            page: Some("p2".to_string()),
            jwt: "abc".to_string(),
            ..ListAspectsPayload::default()
        };
        let request = encode_list(&base(), &payload).expect("encode");
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.url().path(), "/1/aspects");
        assert_eq!(
            request.url().query(),
            Some("schema=urn%3Akestrel%3Aschema%3Aprofile&limit=10&order-desc=false&page=p2")
        );
        assert_eq!(request.header("Authorization"), Some("Bearer abc"));
        check!(request.body().is_none());
    }

    #[test]
    fn wrong_payload_type_is_a_contract_violation() {
        let payload = RetractAspectPayload::default();
        let_assert!(Err(Error::InvalidPayload { endpoint, expected }) = encode_list(&base(), &payload));
        assert_eq!(endpoint, LIST);
        check!(expected.ends_with("ListAspectsPayload"));
    }

    #[test]
    fn invalid_payload_never_reaches_the_wire() {
        let payload = ListAspectsPayload {
            limit: 0,
            ..ListAspectsPayload::default()
        };
        let_assert!(Err(err) = encode_list(&base(), &payload));
        assert_eq!(err.endpoint(), Some(LIST));
        assert_eq!(
            err.validation_errors().map(|errors| errors.fields()),
            Some(vec!["limit"])
        );
    }

    #[test]
    fn read_request_renders_id_and_view() {
        let payload = ReadAspectPayload {
            id: "urn:kestrel:aspect:1".to_string(),
            view: Some("tiny".to_string()),
            jwt: "Token abc".to_string(),
        };
        let request = encode_read(&base(), &payload).expect("encode");
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8080/1/aspects/urn:kestrel:aspect:1?view=tiny"
        );
        assert_eq!(request.header("Authorization"), Some("Token abc"));
    }

    #[test]
    fn create_request_sends_content_as_is() {
        let payload = CreateAspectPayload {
            entity: "urn:kestrel:entity:1".to_string(),
            schema: "urn:kestrel:schema:profile".to_string(),
            policy: None,
            content_type: "application/json".to_string(),
            content: Bytes::from_static(br#"{"name":"Ada"}"#),
            jwt: "abc".to_string(),
        };
        let request = encode_create(&base(), &payload).expect("encode");
        assert_eq!(request.method(), Method::Post);
        assert_eq!(
            request.url().query(),
            Some("entity=urn%3Akestrel%3Aentity%3A1&schema=urn%3Akestrel%3Aschema%3Aprofile")
        );
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.body().map(|body| body.to_vec()), Some(br#"{"name":"Ada"}"#.to_vec()));
    }

    #[test]
    fn read_decodes_the_rendered_view() {
        let response = response(
            200,
            r#"{"id":"urn:kestrel:aspect:1","entity":"urn:kestrel:entity:1","schema":"s"}"#,
        )
        .with_header(VIEW_HEADER, "tiny");
        let aspect = decode_read(&response).expect("decode");
        assert_eq!(aspect.id, "urn:kestrel:aspect:1");
        check!(aspect.content.is_none());

        // The same body misses mandatory attributes of the default view.
        let_assert!(
            Err(Error::Validation { source, .. }) =
                decode_read(&response.clone().with_header(VIEW_HEADER, "default"))
        );
        assert_eq!(
            source.fields(),
            vec!["content", "content-type", "valid-from", "asserter"]
        );
    }

    #[test]
    fn read_reports_every_violation_of_the_default_view() {
        let_assert!(
            Err(Error::Validation { source, .. }) = decode_read(&response(
                200,
                r#"{"id":"urn:kestrel:aspect:1","entity":"not a uri","schema":"s"}"#,
            ))
        );
        assert_eq!(
            source.fields(),
            vec!["content", "content-type", "valid-from", "asserter", "entity"]
        );
    }

    #[test]
    fn list_validates_items_and_links() {
        let_assert!(
            Err(Error::Validation { source, .. }) = decode_list(&response(
                200,
                r#"{"items":[{"id":"urn:a:1","entity":"nope","schema":"s"}],"links":{"self":"/1/aspects"}}"#,
            ))
        );
        assert_eq!(source.fields(), vec!["items[0].entity", "links.self"]);
    }

    #[test]
    fn create_conflict_is_already_created() {
        let_assert!(
            Err(Error::Service(error)) =
                decode_create(&response(409, r#"{"id":"urn:a:1","message":"exists"}"#))
        );
        assert_eq!(error, ServiceError::already_created("urn:a:1", "exists"));
    }

    #[test]
    fn retract_answers_no_content() {
        check!(decode_retract(&response(204, "")).is_ok());
        let_assert!(Err(Error::InvalidResponse { status, body, .. }) = decode_retract(&response(200, "ok")));
        assert_eq!(status, 200);
        assert_eq!(body, "ok");
    }
}
