//! The closed taxonomy of typed service errors and their wire bodies.
//!
//! Each kind carries a stable tag (`bad-request`, `not-found`, ...) that is
//! both the programmatic discriminator and the wire error name, plus a
//! canonical status. On the client side the kind is chosen by the matched
//! status branch, never by the body.

use bytes::Bytes;
use derive_more::{Display, Error};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::dispatch::{Outcome, WireBody};
use crate::{Response, Validate, ValidationErrors, Validator};

/// A typed error returned by a service operation.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum ServiceError {
    /// The request is malformed.
    #[display("bad-request: {message}")]
    BadRequest {
        /// Human-readable message.
        message: String,
    },

    /// A parameter has an unacceptable value.
    #[display("invalid-parameter: {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Offending value, when known.
        value: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// The caller's credentials lack a required scope.
    #[display("invalid-scopes: {message}")]
    InvalidScopes {
        /// Request identifier, when provided.
        id: Option<String>,
        /// Human-readable message.
        message: String,
    },

    /// The operation exists in the API but is not implemented.
    #[display("not-implemented: {message}")]
    NotImplemented {
        /// Human-readable message.
        message: String,
    },

    /// The addressed resource does not exist.
    #[display("not-found: {id}: {message}")]
    NotFound {
        /// Identifier of the missing resource.
        id: String,
        /// Human-readable message.
        message: String,
    },

    /// The service is temporarily unavailable.
    #[display("not-available")]
    NotAvailable,

    /// The request carries no valid credentials.
    #[display("not-authorized")]
    NotAuthorized,

    /// The request body has a content type the operation does not accept.
    #[display("unsupported-content-type: {message}")]
    UnsupportedContentType {
        /// Human-readable message.
        message: String,
    },

    /// The resource to create already exists.
    #[display("already-created: {id}: {message}")]
    AlreadyCreated {
        /// Identifier of the existing resource.
        id: String,
        /// Human-readable message.
        message: String,
    },
}

impl ServiceError {
    /// Create a bad-request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: Option<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value,
            message: message.into(),
        }
    }

    /// Create an invalid-scopes error.
    #[must_use]
    pub fn invalid_scopes(message: impl Into<String>) -> Self {
        Self::InvalidScopes {
            id: None,
            message: message.into(),
        }
    }

    /// Create a not-implemented error.
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Create a not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create an unsupported-content-type error.
    #[must_use]
    pub fn unsupported_content_type(message: impl Into<String>) -> Self {
        Self::UnsupportedContentType {
            message: message.into(),
        }
    }

    /// Create an already-created error.
    #[must_use]
    pub fn already_created(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AlreadyCreated {
            id: id.into(),
            message: message.into(),
        }
    }

    /// The stable kind tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "bad-request",
            Self::InvalidParameter { .. } => "invalid-parameter",
            Self::InvalidScopes { .. } => "invalid-scopes",
            Self::NotImplemented { .. } => "not-implemented",
            Self::NotFound { .. } => "not-found",
            Self::NotAvailable => "not-available",
            Self::NotAuthorized => "not-authorized",
            Self::UnsupportedContentType { .. } => "unsupported-content-type",
            Self::AlreadyCreated { .. } => "already-created",
        }
    }

    /// The status this kind is answered with.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidParameter { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidScopes { .. } => StatusCode::FORBIDDEN,
            Self::NotImplemented { .. } => StatusCode::NOT_IMPLEMENTED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::NotAvailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotAuthorized => StatusCode::UNAUTHORIZED,
            Self::UnsupportedContentType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::AlreadyCreated { .. } => StatusCode::CONFLICT,
        }
    }

    /// The human-readable message, absent for bodiless kinds.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::BadRequest { message }
            | Self::InvalidParameter { message, .. }
            | Self::InvalidScopes { message, .. }
            | Self::NotImplemented { message }
            | Self::NotFound { message, .. }
            | Self::UnsupportedContentType { message }
            | Self::AlreadyCreated { message, .. } => Some(message),
            Self::NotAvailable | Self::NotAuthorized => None,
        }
    }

    /// Serialize the wire body of this kind; bodiless kinds yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode_body(&self) -> crate::Result<Option<Bytes>> {
        let message = self.message().map(str::to_string);
        let body = match self {
            Self::BadRequest { .. } => crate::to_json(&BadRequestBody { message }),
            Self::InvalidParameter { name, value, .. } => crate::to_json(&InvalidParameterBody {
                name: Some(name.clone()),
                value: value.clone(),
                message,
            }),
            Self::InvalidScopes { id, .. } => crate::to_json(&InvalidScopesBody {
                id: id.clone(),
                message,
            }),
            Self::NotImplemented { .. } => crate::to_json(&NotImplementedBody { message }),
            Self::NotFound { id, .. } => crate::to_json(&NotFoundBody {
                id: Some(id.clone()),
                message,
            }),
            Self::UnsupportedContentType { .. } => {
                crate::to_json(&UnsupportedContentTypeBody { message })
            }
            Self::AlreadyCreated { id, .. } => crate::to_json(&AlreadyCreatedBody {
                id: Some(id.clone()),
                message,
            }),
            Self::NotAvailable | Self::NotAuthorized => return Ok(None),
        };
        body.map(Some)
    }
}

// ============================================================================
// Wire bodies
// ============================================================================

macro_rules! message_body {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            /// Human-readable message.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub message: Option<String>,
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), ValidationErrors> {
                let mut v = Validator::new(stringify!($name));
                v.require("message", self.message.as_ref());
                v.finish()
            }
        }

        impl<T> WireBody<T> for $name {
            fn into_outcome(self, _: &Response) -> Result<Outcome<T>, ValidationErrors> {
                Ok(Outcome::Failure(ServiceError::$variant {
                    message: self.message.unwrap_or_default(),
                }))
            }
        }
    };
}

message_body!(
    /// Body of `400 bad-request`.
    BadRequestBody => BadRequest
);
message_body!(
    /// Body of `501 not-implemented`.
    NotImplementedBody => NotImplemented
);
message_body!(
    /// Body of `415 unsupported-content-type`.
    UnsupportedContentTypeBody => UnsupportedContentType
);

/// Body of `422 invalid-parameter`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidParameterBody {
    /// Parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Validate for InvalidParameterBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("InvalidParameterBody");
        v.require("name", self.name.as_ref())
            .require("message", self.message.as_ref());
        v.finish()
    }
}

impl<T> WireBody<T> for InvalidParameterBody {
    fn into_outcome(self, _: &Response) -> Result<Outcome<T>, ValidationErrors> {
        Ok(Outcome::Failure(ServiceError::InvalidParameter {
            name: self.name.unwrap_or_default(),
            value: self.value,
            message: self.message.unwrap_or_default(),
        }))
    }
}

/// Body of `403 invalid-scopes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidScopesBody {
    /// Request identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Validate for InvalidScopesBody {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new("InvalidScopesBody");
        v.require("message", self.message.as_ref());
        v.finish()
    }
}

impl<T> WireBody<T> for InvalidScopesBody {
    fn into_outcome(self, _: &Response) -> Result<Outcome<T>, ValidationErrors> {
        Ok(Outcome::Failure(ServiceError::InvalidScopes {
            id: self.id,
            message: self.message.unwrap_or_default(),
        }))
    }
}

macro_rules! identified_body {
    ($(#[$meta:meta])* $name:ident => $variant:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $name {
            /// Resource identifier.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub id: Option<String>,
            /// Human-readable message.
            #[serde(default, skip_serializing_if = "Option::is_none")]
            pub message: Option<String>,
        }

        impl Validate for $name {
            fn validate(&self) -> Result<(), ValidationErrors> {
                let mut v = Validator::new(stringify!($name));
                v.require("id", self.id.as_ref())
                    .require("message", self.message.as_ref());
                v.finish()
            }
        }

        impl<T> WireBody<T> for $name {
            fn into_outcome(self, _: &Response) -> Result<Outcome<T>, ValidationErrors> {
                Ok(Outcome::Failure(ServiceError::$variant {
                    id: self.id.unwrap_or_default(),
                    message: self.message.unwrap_or_default(),
                }))
            }
        }
    };
}

identified_body!(
    /// Body of `404 not-found`.
    NotFoundBody => NotFound
);
identified_body!(
    /// Body of `409 already-created`.
    AlreadyCreatedBody => AlreadyCreated
);
