//! Body and query serialization utilities.

use bytes::Bytes;

use crate::Result;

/// Content types the codec writes or recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
    /// Plain text content type (`text/plain`).
    PlainText,
    /// Binary content type (`application/octet-stream`).
    OctetStream,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::PlainText => "text/plain",
            Self::OctetStream => "application/octet-stream",
        }
    }

    /// Returns `true` if `header` names this MIME type, parameters ignored.
    ///
    /// ```
    /// use kestrel_core::ContentType;
    ///
    /// assert!(ContentType::Json.matches("application/json; charset=utf-8"));
    /// assert!(!ContentType::Json.matches("text/plain"));
    /// ```
    #[must_use]
    pub fn matches(&self, header: &str) -> bool {
        header
            .split(';')
            .next()
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(self.as_str()))
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use kestrel_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// #[serde(rename_all = "kebab-case")]
/// struct Secret { secret_name: String }
///
/// let secret = Secret { secret_name: "db".to_string() };
/// let bytes = to_json(&secret).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"secret-name":"db"}"#);
/// ```
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Serialize a value to a query string.
///
/// Uses `serde_html_form`, which writes `Vec<T>` as repeated parameters
/// (e.g., `?tags=a&tags=b`). Absent optionals must be skipped with
/// `skip_serializing_if`.
///
/// # Errors
///
/// Returns an error if query serialization fails.
///
/// # Example
///
/// ```
/// use kestrel_core::to_query_string;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Search {
///     entity: String,
///     #[serde(skip_serializing_if = "Option::is_none")]
///     page: Option<String>,
/// }
///
/// let search = Search { entity: "urn:e:1".to_string(), page: None };
/// let query = to_query_string(&search).expect("serialize");
/// assert_eq!(query, "entity=urn%3Ae%3A1");
/// ```
pub fn to_query_string<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_html_form::to_string(value).map_err(Into::into)
}

/// Deserialize a query string (without the leading `?`).
///
/// # Errors
///
/// Returns [`crate::Error::InvalidRequest`] naming the offending parameter
/// when a value does not parse.
pub fn from_query_string<T: serde::de::DeserializeOwned>(query: &str) -> Result<T> {
    serde_html_form::from_str(query)
        .map_err(|e| crate::Error::invalid_request(format!("invalid query string: {e}")))
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// Uses `serde_path_to_error` to provide detailed error messages that include
/// the exact path to the field that failed to deserialize.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g., "items[0].id").
///
/// # Example
///
/// ```
/// use kestrel_core::from_json;
/// use serde::Deserialize;
///
/// #[derive(Debug, PartialEq, Deserialize)]
/// struct Links { #[serde(rename = "self")] self_: Option<String> }
///
/// let bytes = br#"{"self":"https://api.example.com/1/aspects"}"#;
/// let links: Links = from_json(bytes).expect("deserialize");
/// assert_eq!(links.self_.as_deref(), Some("https://api.example.com/1/aspects"));
/// ```
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        crate::Error::json_deserialization(e.path().to_string(), e.inner().to_string())
    })
}
