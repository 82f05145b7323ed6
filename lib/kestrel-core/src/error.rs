//! Error types for kestrel.
//!
//! [`Error`] covers every way a typed call can fail:
//!
//! - encode-time contract violations ([`Error::InvalidPayload`])
//! - transport failures, wrapped per endpoint ([`Error::Request`])
//! - malformed bodies ([`Error::Decoding`])
//! - constraint violations ([`Error::Validation`])
//! - typed service errors ([`Error::Service`])
//! - statuses outside the endpoint table ([`Error::InvalidResponse`])

use derive_more::{Display, Error, From};

use crate::{Endpoint, ServiceError, ValidationErrors};

/// Main error type for kestrel operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// Invalid request configuration.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "items[0].id").
        path: String,
        /// Error message.
        message: String,
    },

    /// Query string serialization error.
    #[display("query serialization error: {_0}")]
    #[from]
    QuerySerialization(serde_html_form::ser::Error),

    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// An encoder was handed a payload of the wrong type.
    #[display("{endpoint}: invalid payload type, expected {expected}")]
    #[from(skip)]
    InvalidPayload {
        /// Endpoint whose encoder was called.
        endpoint: Endpoint,
        /// Expected payload type.
        expected: &'static str,
    },

    /// The transport failed to perform the request.
    #[display("{endpoint}: request failed: {source}")]
    #[from(skip)]
    Request {
        /// Endpoint being called.
        endpoint: Endpoint,
        /// Transport failure.
        source: Box<Error>,
    },

    /// A response or request body could not be decoded.
    #[display("{endpoint}: decoding failed: {source}")]
    #[from(skip)]
    Decoding {
        /// Endpoint being decoded.
        endpoint: Endpoint,
        /// Decoding failure.
        source: Box<Error>,
    },

    /// A structure broke its declared constraints.
    #[display("{endpoint}: validation failed: {source}")]
    #[from(skip)]
    Validation {
        /// Endpoint whose structure was validated.
        endpoint: Endpoint,
        /// Every violation found.
        source: ValidationErrors,
    },

    /// The response status is not part of the endpoint's table.
    #[display("{endpoint}: invalid response status {status}: {body}")]
    #[from(skip)]
    InvalidResponse {
        /// Endpoint being decoded.
        endpoint: Endpoint,
        /// Received status.
        status: u16,
        /// Raw body text.
        body: String,
    },

    /// A typed service error.
    #[display("{_0}")]
    #[from]
    Service(ServiceError),

    /// A command-line flag could not be turned into a payload attribute.
    #[display("invalid value for {flag}: {message}")]
    #[from(skip)]
    InvalidFlag {
        /// Flag name.
        flag: &'static str,
        /// What is wrong with the value.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid payload error.
    #[must_use]
    pub const fn invalid_payload(endpoint: Endpoint, expected: &'static str) -> Self {
        Self::InvalidPayload { endpoint, expected }
    }

    /// Wrap a transport failure.
    #[must_use]
    pub fn request(endpoint: Endpoint, source: Self) -> Self {
        Self::Request {
            endpoint,
            source: Box::new(source),
        }
    }

    /// Wrap a decoding failure.
    #[must_use]
    pub fn decoding(endpoint: Endpoint, source: Self) -> Self {
        Self::Decoding {
            endpoint,
            source: Box::new(source),
        }
    }

    /// Wrap constraint violations.
    #[must_use]
    pub const fn validation(endpoint: Endpoint, source: ValidationErrors) -> Self {
        Self::Validation { endpoint, source }
    }

    /// Create an invalid response error.
    #[must_use]
    pub fn invalid_response(endpoint: Endpoint, status: u16, body: impl Into<String>) -> Self {
        Self::InvalidResponse {
            endpoint,
            status,
            body: body.into(),
        }
    }

    /// Create an invalid flag error.
    #[must_use]
    pub fn invalid_flag(flag: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidFlag {
            flag,
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error, wrapped or not.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout => true,
            Self::Request { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` if this is a connection error, wrapped or not.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Connection(_) => true,
            Self::Request { source, .. } => source.is_connection(),
            _ => false,
        }
    }

    /// The endpoint this error was raised for, if any.
    #[must_use]
    pub const fn endpoint(&self) -> Option<Endpoint> {
        match self {
            Self::InvalidPayload { endpoint, .. }
            | Self::Request { endpoint, .. }
            | Self::Decoding { endpoint, .. }
            | Self::Validation { endpoint, .. }
            | Self::InvalidResponse { endpoint, .. } => Some(*endpoint),
            _ => None,
        }
    }

    /// The HTTP status behind this error, when one was received.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status, .. } => Some(*status),
            Self::Service(error) => Some(error.status().as_u16()),
            _ => None,
        }
    }

    /// The typed service error, if this is one.
    #[must_use]
    pub const fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(error) => Some(error),
            _ => None,
        }
    }

    /// The kind tag of a typed service error.
    #[must_use]
    pub fn kind(&self) -> Option<&'static str> {
        self.service_error().map(ServiceError::kind)
    }

    /// The constraint violations of a validation error.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;

    const LIST: Endpoint = Endpoint::new("aspect", "list");

    #[test]
    fn error_display() {
        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("items[0].id", "invalid type");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'items[0].id': invalid type"
        );

        let err = Error::invalid_payload(LIST, "ListAspectPayload");
        assert_eq!(
            err.to_string(),
            "aspect.list: invalid payload type, expected ListAspectPayload"
        );

        let err = Error::invalid_response(LIST, 418, "teapot");
        assert_eq!(
            err.to_string(),
            "aspect.list: invalid response status 418: teapot"
        );
    }

    #[test]
    fn wrapped_errors_keep_endpoint_and_cause() {
        let err = Error::request(LIST, Error::Timeout);
        assert_eq!(err.to_string(), "aspect.list: request failed: request timeout");
        assert!(err.is_timeout());
        assert!(!err.is_connection());
        assert_eq!(err.endpoint(), Some(LIST));

        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("request timeout"));
    }

    #[test]
    fn validation_error_exposes_violations() {
        let err = Error::validation(
            LIST,
            ValidationError::missing("links", "AspectListResult").into(),
        );
        assert_eq!(
            err.to_string(),
            r#"aspect.list: validation failed: "links" is missing from AspectListResult"#
        );
        assert_eq!(
            err.validation_errors().map(ValidationErrors::fields),
            Some(vec!["links"])
        );
    }

    #[test]
    fn service_errors_expose_kind() {
        let err = Error::from(ServiceError::NotAuthorized);
        assert_eq!(err.kind(), Some("not-authorized"));
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.endpoint(), None);
        assert_eq!(Error::invalid_response(LIST, 418, "").status(), Some(418));
        assert!(Error::Timeout.kind().is_none());
    }
}
