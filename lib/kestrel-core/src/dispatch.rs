//! Status-code dispatch for response decoding.
//!
//! Every endpoint owns a [`ResponseTable`]: a fixed list of [`Branch`]es
//! keyed by HTTP status. A branch either decodes a wire body (decode, then
//! [`Validate`], then [`WireBody::into_outcome`]) or builds its outcome
//! directly for bodiless statuses. The matched branch alone decides the
//! outcome; nothing inside the body can re-classify it. A status missing
//! from the table ends in [`Error::InvalidResponse`] carrying the raw body.
//!
//! Tables are `static` values assembled from `const fn`s:
//!
//! ```
//! use kestrel_core::dispatch::{Branch, ResponseTable, no_content, not_authorized};
//! use kestrel_core::{Endpoint, StatusCode};
//!
//! const BRANCHES: &[Branch<()>] = &[
//!     Branch::empty(StatusCode::NO_CONTENT, no_content),
//!     Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
//! ];
//! static RETRACT: ResponseTable<()> =
//!     ResponseTable::new(Endpoint::new("aspect", "retract"), BRANCHES);
//!
//! assert_eq!(RETRACT.statuses(), vec![204, 401]);
//! ```

use http::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::{
    Endpoint, Error, Projection, Response, Result, ServiceError, VIEW_HEADER, Validate,
    ValidationErrors, Viewed,
};

/// What a matched status branch produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation result.
    Success(T),
    /// A typed error of the fixed taxonomy.
    Failure(ServiceError),
}

/// A wire body decoded for one status branch.
///
/// The body is validated with [`Validate`] before conversion, so
/// implementations can rely on every required field being present.
pub trait WireBody<T>: DeserializeOwned + Validate {
    /// Convert the validated body into the outcome of its branch.
    ///
    /// The response is available for header-carried metadata (such as the
    /// rendered view name).
    fn into_outcome(self, response: &Response) -> std::result::Result<Outcome<T>, ValidationErrors>;
}

/// The success body of an endpoint returning a view-projected result.
///
/// The view is named by the `x-view` response header (absent means
/// `default`). The mandatory attributes of that view and the attribute
/// constraints are checked together once the view is known, so every
/// violation is reported at once.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct ViewedBody<P>(pub P);

// Checked in `into_outcome` through `Viewed::validate`.
impl<P: Projection> Validate for ViewedBody<P> {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        Ok(())
    }
}

impl<P> WireBody<P::Full> for ViewedBody<P>
where
    P: Projection + DeserializeOwned,
{
    fn into_outcome(
        self,
        response: &Response,
    ) -> std::result::Result<Outcome<P::Full>, ValidationErrors> {
        let viewed = Viewed::received(self.0, response.header(VIEW_HEADER))?;
        viewed.validate()?;
        Ok(Outcome::Success(viewed.into_full()))
    }
}

enum Failure {
    Decode(Error),
    Validation(ValidationErrors),
}

enum Step<T> {
    Body(fn(&Response) -> std::result::Result<Outcome<T>, Failure>),
    Empty(fn() -> Outcome<T>),
}

/// One entry of a [`ResponseTable`].
pub struct Branch<T> {
    status: StatusCode,
    step: Step<T>,
}

impl<T> Branch<T> {
    /// A branch decoding the wire body `W`.
    #[must_use]
    pub const fn body<W: WireBody<T>>(status: StatusCode) -> Self {
        Self {
            status,
            step: Step::Body(decode_body::<W, T>),
        }
    }

    /// A bodiless branch; the body, if any, is ignored.
    #[must_use]
    pub const fn empty(status: StatusCode, build: fn() -> Outcome<T>) -> Self {
        Self {
            status,
            step: Step::Empty(build),
        }
    }

    /// The status this branch handles.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns `true` if this branch decodes a body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self.step, Step::Body(_))
    }
}

impl<T> std::fmt::Debug for Branch<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch")
            .field("status", &self.status)
            .field("has_body", &self.has_body())
            .finish()
    }
}

fn decode_body<W: WireBody<T>, T>(response: &Response) -> std::result::Result<Outcome<T>, Failure> {
    let body: W = crate::from_json(response.body()).map_err(Failure::Decode)?;
    body.validate().map_err(Failure::Validation)?;
    body.into_outcome(response).map_err(Failure::Validation)
}

/// The status dispatch table of one endpoint.
#[derive(Debug)]
pub struct ResponseTable<T: 'static> {
    endpoint: Endpoint,
    branches: &'static [Branch<T>],
}

impl<T: 'static> ResponseTable<T> {
    /// Declare the table of `endpoint`.
    #[must_use]
    pub const fn new(endpoint: Endpoint, branches: &'static [Branch<T>]) -> Self {
        Self { endpoint, branches }
    }

    /// The endpoint this table decodes for.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Statuses with a branch, in declaration order.
    #[must_use]
    pub fn statuses(&self) -> Vec<u16> {
        self.branches.iter().map(|b| b.status.as_u16()).collect()
    }

    /// The branch for `status`, if any.
    #[must_use]
    pub fn branch(&self, status: u16) -> Option<&'static Branch<T>> {
        self.branches.iter().find(|b| b.status.as_u16() == status)
    }

    /// Decode a buffered response.
    ///
    /// The response is only borrowed: its body can be read again once
    /// decoding is done.
    ///
    /// # Errors
    ///
    /// - [`Error::Service`] for an error branch of the table
    /// - [`Error::Decoding`] when the branch body is malformed
    /// - [`Error::Validation`] when the branch body breaks its constraints
    /// - [`Error::InvalidResponse`] for a status outside the table
    pub fn decode(&self, response: &Response) -> Result<T> {
        let Some(branch) = self.branch(response.status()) else {
            return Err(Error::invalid_response(
                self.endpoint,
                response.status(),
                response.text_lossy(),
            ));
        };

        let outcome = match branch.step {
            Step::Empty(build) => build(),
            Step::Body(decode) => decode(response).map_err(|failure| match failure {
                Failure::Decode(source) => Error::decoding(self.endpoint, source),
                Failure::Validation(source) => Error::validation(self.endpoint, source),
            })?,
        };

        match outcome {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(Error::Service(error)),
        }
    }
}

/// Outcome of a bodiless success such as `204 No Content`.
#[must_use]
pub const fn no_content() -> Outcome<()> {
    Outcome::Success(())
}

/// Outcome of a bodiless `401`.
#[must_use]
pub const fn not_authorized<T>() -> Outcome<T> {
    Outcome::Failure(ServiceError::NotAuthorized)
}

/// Outcome of a bodiless `503`.
#[must_use]
pub const fn not_available<T>() -> Outcome<T> {
    Outcome::Failure(ServiceError::NotAvailable)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert2::let_assert;
    use bytes::Bytes;
    use serde::Deserialize;

    use super::*;
    use crate::Validator;
    use crate::service_error::{BadRequestBody, InvalidScopesBody, NotFoundBody};

    #[derive(Debug, Deserialize)]
    struct GreetingBody {
        greeting: Option<String>,
    }

    impl Validate for GreetingBody {
        fn validate(&self) -> std::result::Result<(), ValidationErrors> {
            let mut v = Validator::new("GreetingBody");
            v.require("greeting", self.greeting.as_ref());
            v.finish()
        }
    }

    impl WireBody<String> for GreetingBody {
        fn into_outcome(self, _: &Response) -> std::result::Result<Outcome<String>, ValidationErrors> {
            Ok(Outcome::Success(self.greeting.unwrap_or_default()))
        }
    }

    const BRANCHES: &[Branch<String>] = &[
        Branch::body::<GreetingBody>(StatusCode::OK),
        Branch::body::<BadRequestBody>(StatusCode::BAD_REQUEST),
        Branch::empty(StatusCode::UNAUTHORIZED, not_authorized),
        Branch::body::<InvalidScopesBody>(StatusCode::FORBIDDEN),
        Branch::body::<NotFoundBody>(StatusCode::NOT_FOUND),
        Branch::empty(StatusCode::SERVICE_UNAVAILABLE, not_available),
    ];

    static GREET: ResponseTable<String> =
        ResponseTable::new(Endpoint::new("greeter", "greet"), BRANCHES);

    fn response(status: u16, body: &'static str) -> Response {
        Response::new(status, HashMap::new(), Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn success_branch_decodes_and_converts() {
        let greeting = GREET.decode(&response(200, r#"{"greeting":"hello"}"#));
        assert_eq!(greeting.ok().as_deref(), Some("hello"));
    }

    #[test]
    fn success_branch_validates() {
        let_assert!(Err(Error::Validation { endpoint, source }) = GREET.decode(&response(200, "{}")));
        assert_eq!(endpoint.to_string(), "greeter.greet");
        assert_eq!(source.fields(), vec!["greeting"]);
    }

    #[test]
    fn malformed_body_is_a_decoding_error() {
        let_assert!(Err(Error::Decoding { endpoint, .. }) = GREET.decode(&response(200, "nope")));
        assert_eq!(endpoint, Endpoint::new("greeter", "greet"));
    }

    #[test]
    fn error_branch_yields_its_kind() {
        let_assert!(
            Err(Error::Service(error)) =
                GREET.decode(&response(403, r#"{"id":"r-1","message":"forbidden"}"#))
        );
        assert_eq!(
            error,
            ServiceError::InvalidScopes {
                id: Some("r-1".to_string()),
                message: "forbidden".to_string(),
            }
        );
        assert_eq!(error.kind(), "invalid-scopes");
    }

    #[test]
    fn body_content_never_reclassifies_the_branch() {
        // A not-found shaped body under 400 is still a bad request.
        let_assert!(
            Err(Error::Service(error)) =
                GREET.decode(&response(400, r#"{"id":"x","message":"not-found"}"#))
        );
        assert_eq!(error.kind(), "bad-request");
    }

    #[test]
    fn bodiless_branches_ignore_the_body() {
        let_assert!(Err(Error::Service(error)) = GREET.decode(&response(401, "")));
        assert_eq!(error, ServiceError::NotAuthorized);

        let_assert!(Err(Error::Service(error)) = GREET.decode(&response(401, "garbage {")));
        assert_eq!(error, ServiceError::NotAuthorized);

        let_assert!(Err(Error::Service(error)) = GREET.decode(&response(503, "")));
        assert_eq!(error, ServiceError::NotAvailable);
    }

    #[test]
    fn unknown_status_is_an_invalid_response() {
        let_assert!(
            Err(Error::InvalidResponse { endpoint, status, body }) =
                GREET.decode(&response(418, "short and stout"))
        );
        assert_eq!(endpoint.to_string(), "greeter.greet");
        assert_eq!(status, 418);
        assert_eq!(body, "short and stout");
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Tag {
        name: String,
        color: Option<String>,
        homepage: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    struct TagView {
        name: Option<String>,
        color: Option<String>,
        homepage: Option<String>,
    }

    const TAG_VIEW_LIST: &[crate::View] = &[
        crate::View::new("default", &["name", "color", "homepage"], &["name", "color"]),
        crate::View::new("short", &["name"], &["name"]),
    ];
    static TAG_VIEWS: crate::ViewSet = crate::ViewSet::new("Tag", TAG_VIEW_LIST);

    impl Projection for TagView {
        type Full = Tag;
        const VIEWS: &'static crate::ViewSet = &TAG_VIEWS;

        fn project(full: &Tag, view: &crate::View) -> Self {
            Self {
                name: view.carry("name", &full.name),
                color: view.carry_optional("color", full.color.as_ref()),
                homepage: view.carry_optional("homepage", full.homepage.as_ref()),
            }
        }

        fn unproject(self) -> Tag {
            Tag {
                name: self.name.unwrap_or_default(),
                color: self.color,
                homepage: self.homepage,
            }
        }

        fn is_present(&self, attribute: &str) -> bool {
            match attribute {
                "name" => self.name.is_some(),
                "color" => self.color.is_some(),
                "homepage" => self.homepage.is_some(),
                _ => false,
            }
        }

        fn validate_attributes(&self, v: &mut Validator) {
            v.format("homepage", self.homepage.as_deref(), crate::Format::Uri);
        }
    }

    const TAG_BRANCHES: &[Branch<Tag>] = &[Branch::body::<ViewedBody<TagView>>(StatusCode::OK)];
    static READ_TAG: ResponseTable<Tag> =
        ResponseTable::new(Endpoint::new("tag", "read"), TAG_BRANCHES);

    #[test]
    fn viewed_body_follows_the_view_header() {
        let short = response(200, r#"{"name":"red"}"#).with_header(VIEW_HEADER, "short");
        let tag = READ_TAG.decode(&short).expect("short view");
        assert_eq!(
            tag,
            Tag {
                name: "red".to_string(),
                color: None,
                homepage: None,
            }
        );

        // Without the header the default view applies and color is mandatory.
        let_assert!(
            Err(Error::Validation { source, .. }) = READ_TAG.decode(&response(200, r#"{"name":"red"}"#))
        );
        assert_eq!(source.fields(), vec!["color"]);

        let unknown = response(200, r#"{"name":"red"}"#).with_header(VIEW_HEADER, "huge");
        let_assert!(Err(Error::Validation { source, .. }) = READ_TAG.decode(&unknown));
        assert_eq!(source.fields(), vec!["view"]);
    }

    #[test]
    fn viewed_body_reports_missing_and_malformed_attributes_together() {
        let body = response(200, r#"{"name":"red","homepage":"not a uri"}"#);
        let_assert!(Err(Error::Validation { source, .. }) = READ_TAG.decode(&body));
        assert_eq!(source.fields(), vec!["color", "homepage"]);
    }

    #[test]
    fn table_lists_its_statuses() {
        assert_eq!(GREET.statuses(), vec![200, 400, 401, 403, 404, 503]);
        assert!(GREET.branch(200).is_some_and(Branch::has_body));
        assert!(GREET.branch(401).is_some_and(|b| !b.has_body()));
        assert!(GREET.branch(500).is_none());
    }
}
