//! Server half of the secret codec.

use bytes::Bytes;
use kestrel_core::{Method, PathParams, ServiceError, Validate};

use super::types::GetQuery;
use super::{
    COLLECTION, GetSecretPayload, ListSecretsPayload, MEMBER, READ_SCHEME, SecretListResultView,
    SecretResultView, SecretService, SetSecretBody, SetSecretPayload, WRITE_SCHEME,
};
use crate::security::Authenticator;
use crate::server::{
    Handler, Route, authenticate, bad_request, bearer_token, decode_json, decode_query,
    encode_viewed, finish, no_content, no_route,
};
use crate::{Request, Response};

type Answer = Result<Response<Bytes>, ServiceError>;

const LIST_ROUTE: Route = Route::new(Method::Get, COLLECTION);
const GET_ROUTE: Route = Route::new(Method::Get, MEMBER);
const SET_ROUTE: Route = Route::new(Method::Post, COLLECTION);

/// Serves the secret routes on top of a [`SecretService`].
#[derive(Debug, Clone)]
pub struct SecretHandler<S, A> {
    service: S,
    auth: A,
}

impl<S: SecretService, A: Authenticator> SecretHandler<S, A> {
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
        let mut payload: ListSecretsPayload = decode_query(request)?;
        payload.jwt = bearer_token(request)?;
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &READ_SCHEME)?;
        let result = self.service.list(&context, payload).await?;
        Ok(encode_viewed::<SecretListResultView>(&result, None))
    }

    async fn get(&self, request: &Request<Bytes>, params: &PathParams) -> Answer {
        let query: GetQuery = decode_query(request)?;
        let payload = GetSecretPayload {
            name: params.get("name").unwrap_or_default().to_string(),
            secret_type: query.secret_type,
            view: query.view,
            jwt: bearer_token(request)?,
        };
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &READ_SCHEME)?;
        let view = payload.view.clone();
        let result = self.service.get(&context, payload).await?;
        Ok(encode_viewed::<SecretResultView>(&result, view.as_deref()))
    }

    async fn set(&self, request: &Request<Bytes>) -> Answer {
        let body: SetSecretBody = decode_json(request)?;
        body.validate().map_err(bad_request)?;
        let payload = SetSecretPayload {
            secret: body.into(),
            jwt: bearer_token(request)?,
        };
        payload.validate().map_err(bad_request)?;

        let context = authenticate(&self.auth, &payload.jwt, &WRITE_SCHEME)?;
        self.service.set(&context, payload).await?;
        Ok(no_content())
    }
}

impl<S: SecretService, A: Authenticator> Handler for SecretHandler<S, A> {
    async fn handle(&self, request: Request<Bytes>) -> Response<Bytes> {
        if LIST_ROUTE.matches(&request).is_some() {
            finish(self.list(&request).await)
        } else if SET_ROUTE.matches(&request).is_some() {
            finish(self.set(&request).await)
        } else if let Some(params) = GET_ROUTE.matches(&request) {
            finish(self.get(&request, &params).await)
        } else {
            no_route(&request)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{SecretListResult, SecretResult};
    use super::*;
    use crate::links::Links;
    use crate::security::{Context, JwtScheme};
    use crate::server::ERROR_NAME_HEADER;

    struct Refusing;

    impl SecretService for Refusing {
        async fn list(&self, _: &Context, _: ListSecretsPayload) -> Result<SecretListResult, ServiceError> {
            Ok(SecretListResult {
                items: Vec::new(),
                links: Links::single("http://localhost/1/secrets"),
            })
        }

        async fn get(&self, _: &Context, _: GetSecretPayload) -> Result<SecretResult, ServiceError> {
            Err(ServiceError::NotAvailable)
        }

        async fn set(&self, _: &Context, _: SetSecretPayload) -> Result<(), ServiceError> {
            Ok(())
        }
    }

    fn handler() -> impl Handler {
        fn read_only(context: Context, _: &str, scheme: &JwtScheme) -> Result<Context, ServiceError> {
            if scheme.missing_scopes(&["secret:read"]).is_empty() {
                Ok(context)
            } else {
                Err(ServiceError::invalid_scopes("secret:write required"))
            }
        }
        SecretHandler::new(Refusing, read_only)
    }

    fn request(method: Method, path: &str) -> Request<Bytes> {
        let url = url::Url::parse("http://localhost").and_then(|base| base.join(path));
        Request::builder(method, url.expect("url")).bearer_auth("abc").build()
    }

    #[tokio::test]
    async fn list_answers_the_default_view() {
        let response = handler().handle(request(Method::Get, "/1/secrets")).await;
        assert_eq!(response.status(), 200);
        insta::assert_snapshot!(
            response.text_lossy(),
            @r#"{"items":[],"links":{"self":"http://localhost/1/secrets"}}"#
        );
    }

    #[tokio::test]
    async fn set_checks_scopes_after_decoding() {
        let malformed = handler().handle(request(Method::Post, "/1/secrets")).await;
        assert_eq!(malformed.status(), 400);

        let valid = Request::builder(
            Method::Post,
            url::Url::parse("http://localhost/1/secrets").expect("url"),
        )
        .bearer_auth("abc")
        .body(Bytes::from_static(
            br#"{"secret-name":"db","secret-value":"x","expiry-time":1}"#,
        ))
        .build();
        let response = handler().handle(valid).await;
        assert_eq!(response.status(), 403);
        assert_eq!(response.header(ERROR_NAME_HEADER), Some("invalid-scopes"));
    }

    #[tokio::test]
    async fn bodiless_errors_have_no_body() {
        let response = handler().handle(request(Method::Get, "/1/secrets/db")).await;
        assert_eq!(response.status(), 503);
        assert!(response.body().is_empty());
        assert_eq!(response.header(ERROR_NAME_HEADER), Some("not-available"));
    }
}
