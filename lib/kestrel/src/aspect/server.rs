//! Server half of the aspect codec.

use bytes::Bytes;
use kestrel_core::{ContentType, Method, PathParams, ServiceError, Validate};

use super::types::{CreateQuery, ViewQuery};
use super::{
    AspectIdResultView, AspectListResultView, AspectRTView, AspectService, COLLECTION,
    CreateAspectPayload, ListAspectsPayload, MEMBER, READ_SCHEME, ReadAspectPayload,
    RetractAspectPayload, WRITE_SCHEME,
};
use crate::security::Authenticator;
use crate::server::{
    Handler, Route, authenticate, bad_request, bearer_token, decode_query, encode_viewed, finish,
    no_content, no_route,
};
use crate::{Request, Response};

type Answer = Result<Response<Bytes>, ServiceError>;

const LIST_ROUTE: Route = Route::new(Method::Get, COLLECTION);
const READ_ROUTE: Route = Route::new(Method::Get, MEMBER);
const CREATE_ROUTE: Route = Route::new(Method::Post, COLLECTION);
const RETRACT_ROUTE: Route = Route::new(Method::Delete, MEMBER);

/// Serves the aspect routes on top of an [`AspectService`].
///
/// Every operation decodes and validates its payload (`400` on failure),
/// authenticates the bearer token against the operation's scheme, calls
/// the service and encodes its answer.
#[derive(Debug, Clone)]
pub struct AspectHandler<S, A> {
    service: S,
    auth: A,
}

impl<S: AspectService, A: Authenticator> AspectHandler<S, A> {
    /// Serve `service`, authenticating callers with `auth`.
    #[must_use]
    pub const fn new(service: S, auth: A) -> Self {
        Self { service, auth }
    }

    /// The wrapped service.
    #[must_use]
    pub const fn service(&self) -> &S {
        &self.service
    }

    async fn list(&self, request: &Request<Bytes>) -> Answer {
        let mut payload: ListAspectsPayload = decode_query(request)?;
        payload.jwt = bearer_token(request)?;
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &READ_SCHEME)?;
        let result = self.service.list(&context, payload).await?;
        Ok(encode_viewed::<AspectListResultView>(&result, None))
    }

    async fn read(&self, request: &Request<Bytes>, params: &PathParams) -> Answer {
        let query: ViewQuery = decode_query(request)?;
        let payload = ReadAspectPayload {
            id: params.get("id").unwrap_or_default().to_string(),
            view: query.view,
            jwt: bearer_token(request)?,
        };
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &READ_SCHEME)?;
        let view = payload.view.clone();
        let result = self.service.read(&context, payload).await?;
        Ok(encode_viewed::<AspectRTView>(&result, view.as_deref()))
    }

    async fn create(&self, request: &Request<Bytes>) -> Answer {
        let query: CreateQuery = decode_query(request)?;
        query.validate().map_err(bad_request)?;
        let content_type = request
            .header("content-type")
            .ok_or_else(|| ServiceError::unsupported_content_type("missing content type"))?;
        let content = request.body().cloned().unwrap_or_default();
        if ContentType::Json.matches(content_type) {
            serde_json::from_slice::<serde_json::Value>(&content).map_err(bad_request)?;
        }

        let payload = CreateAspectPayload {
            entity: query.entity.unwrap_or_default(),
            schema: query.schema.unwrap_or_default(),
            policy: query.policy,
            content_type: content_type.to_string(),
            content,
            jwt: bearer_token(request)?,
        };
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &WRITE_SCHEME)?;
        let result = self.service.create(&context, payload).await?;
        Ok(encode_viewed::<AspectIdResultView>(&result, None))
    }

    async fn retract(&self, request: &Request<Bytes>, params: &PathParams) -> Answer {
        let payload = RetractAspectPayload {
            id: params.get("id").unwrap_or_default().to_string(),
            jwt: bearer_token(request)?,
        };
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &WRITE_SCHEME)?;
        self.service.retract(&context, payload).await?;
        Ok(no_content())
    }
}

impl<S: AspectService, A: Authenticator> Handler for AspectHandler<S, A> {
    async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        if LIST_ROUTE.matches(&request).is_some() {
            finish(self.list(&request).await)
        } else if CREATE_ROUTE.matches(&request).is_some() {
            finish(self.create(&request).await)
        } else if let Some(params) = READ_ROUTE.matches(&request) {
            finish(self.read(&request, &params).await)
        } else if let Some(params) = RETRACT_ROUTE.matches(&request) {
            finish(self.retract(&request, &params).await)
        } else {
            no_route(&request)
        }
    }
}

#[cfg(test)]
mod tests {
    use assert2::check;
    use kestrel_core::VIEW_HEADER;

    use super::*;
    use super::super::{AspectIdResult, AspectListResult, AspectRT};
    use crate::links::Links;
    use crate::security::{Context, JwtScheme};
    use crate::server::ERROR_NAME_HEADER;

    struct Fixed;

    impl AspectService for Fixed {
        async fn list(&self, _: &Context, payload: ListAspectsPayload) -> Result<AspectListResult, ServiceError> {
            Ok(AspectListResult {
                items: Vec::new(),
                entity: payload.entity,
                schema: None,
                aspect_path: None,
                at_time: None,
                links: Links::single("http://localhost/1/aspects"),
            })
        }

        async fn read(&self, _: &Context, payload: ReadAspectPayload) -> Result<AspectRT, ServiceError> {
            Ok(AspectRT {
                id: payload.id,
                entity: "urn:kestrel:entity:1".to_string(),
                schema: "urn:kestrel:schema:profile".to_string(),
                ..AspectRT::default()
            })
        }

        async fn create(&self, _: &Context, _: CreateAspectPayload) -> Result<AspectIdResult, ServiceError> {
            Err(ServiceError::not_implemented("create"))
        }

        async fn retract(&self, _: &Context, payload: RetractAspectPayload) -> Result<(), ServiceError> {
            Err(ServiceError::not_found(payload.id, "no such aspect"))
        }
    }

    fn handler() -> impl Handler {
        fn allow(context: Context, _: &str, _: &JwtScheme) -> Result<Context, ServiceError> {
            Ok(context)
        }
        AspectHandler::new(Fixed, allow)
    }

    fn request(method: Method, url: &str) -> Request<Bytes> {
        Request::builder(method, url::Url::parse(url).expect("url"))
            .bearer_auth("abc")
            .build()
    }

    #[tokio::test]
    async fn read_renders_the_requested_view() {
        let response = handler()
            .handle(request(Method::Get, "http://localhost/1/aspects/urn:a:1?view=tiny"))
            .await;
        assert_eq!(response.status(), 200);
        assert_eq!(response.header(VIEW_HEADER), Some("tiny"));
        insta::assert_snapshot!(
            response.text_lossy(),
            @r#"{"id":"urn:a:1","entity":"urn:kestrel:entity:1","schema":"urn:kestrel:schema:profile"}"#
        );
    }

    #[tokio::test]
    async fn incomplete_default_view_is_a_server_defect() {
        let response = handler()
            .handle(request(Method::Get, "http://localhost/1/aspects/urn:a:1"))
            .await;
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn unknown_view_is_a_bad_request() {
        let response = handler()
            .handle(request(Method::Get, "http://localhost/1/aspects/urn:a:1?view=huge"))
            .await;
        assert_eq!(response.status(), 400);
        assert_eq!(response.header(ERROR_NAME_HEADER), Some("bad-request"));
    }

    #[tokio::test]
    async fn create_without_content_type_is_unsupported() {
        let response = handler()
            .handle(request(
                Method::Post,
                "http://localhost/1/aspects?entity=urn%3Ae%3A1&schema=s",
            ))
            .await;
        assert_eq!(response.status(), 415);
    }

    #[tokio::test]
    async fn service_errors_use_their_status() {
        let response = handler()
            .handle(request(Method::Delete, "http://localhost/1/aspects/urn:a:1"))
            .await;
        assert_eq!(response.status(), 404);
        assert_eq!(response.header(ERROR_NAME_HEADER), Some("not-found"));
    }

    #[tokio::test]
    async fn missing_credentials_are_not_authorized() {
        let unauthenticated = Request::builder(
            Method::Get,
            url::Url::parse("http://localhost/1/aspects").expect("url"),
        )
        .build();
        let response = handler().handle(unauthenticated).await;
        assert_eq!(response.status(), 401);
        check!(response.body().is_empty());
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let response = handler()
            .handle(request(Method::Delete, "http://localhost/1/aspects"))
            .await;
        assert_eq!(response.status(), 404);
        check!(response.header(ERROR_NAME_HEADER).is_none());
    }
}
