//! Conversions from raw command-line flag values into payload attributes.
//!
//! Flags arrive as strings; an empty string means the flag was not given.
//! Every parse failure names the offending flag.

use crate::{Error, Result};

/// `None` for an empty flag.
#[must_use]
pub fn optional(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// A flag that must be given.
///
/// # Errors
///
/// Returns [`Error::InvalidFlag`] when `value` is empty.
pub fn required(flag: &'static str, value: &str) -> Result<String> {
    optional(value).ok_or_else(|| Error::invalid_flag(flag, "missing required flag"))
}

/// An optional integer flag.
///
/// # Errors
///
/// Returns [`Error::InvalidFlag`] when `value` is not an integer.
pub fn optional_i64(flag: &'static str, value: &str) -> Result<Option<i64>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|err| Error::invalid_flag(flag, format!("must be an integer: {err}")))
}

/// An optional boolean flag (`true` or `false`).
///
/// # Errors
///
/// Returns [`Error::InvalidFlag`] when `value` is not a boolean.
pub fn optional_bool(flag: &'static str, value: &str) -> Result<Option<bool>> {
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|err| Error::invalid_flag(flag, format!("must be a boolean: {err}")))
}

/// A JSON document flag, parsed into `T`.
///
/// # Errors
///
/// Returns [`Error::InvalidFlag`] when `value` is not valid JSON for `T`.
pub fn json<T: serde::de::DeserializeOwned>(flag: &'static str, value: &str) -> Result<T> {
    serde_json::from_str(value)
        .map_err(|err| Error::invalid_flag(flag, format!("invalid JSON: {err}")))
}
