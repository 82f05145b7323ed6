//! The bearer rule for the `Authorization` header.
//!
//! Clients write `Bearer <token>`, unless the token already contains a
//! space: then it is taken to carry its own scheme and is written verbatim.
//! Servers strip a leading `Bearer` scheme before handing the token to the
//! authentication callback.

/// Name of the authorization header.
pub const AUTHORIZATION: &str = "Authorization";

const BEARER: &str = "Bearer";

/// The `Authorization` header value for `token`.
///
/// ```
/// use kestrel_core::authorization_value;
///
/// assert_eq!(authorization_value("abc"), "Bearer abc");
/// assert_eq!(authorization_value("Bearer abc"), "Bearer abc");
/// assert_eq!(authorization_value("Basic Zm9v"), "Basic Zm9v");
/// ```
#[must_use]
pub fn authorization_value(token: &str) -> String {
    if token.contains(' ') {
        token.to_string()
    } else {
        format!("{BEARER} {token}")
    }
}

/// The token carried by an `Authorization` header value.
///
/// A `Bearer` scheme (any case) is removed; any other value is returned
/// unchanged.
///
/// ```
/// use kestrel_core::strip_scheme;
///
/// assert_eq!(strip_scheme("Bearer abc"), "abc");
/// assert_eq!(strip_scheme("bearer  abc"), "abc");
/// assert_eq!(strip_scheme("abc"), "abc");
/// ```
#[must_use]
pub fn strip_scheme(value: &str) -> &str {
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case(BEARER) => token.trim_start(),
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_token_gets_bearer_scheme() {
        assert_eq!(authorization_value("eyJhbGciOi.x.y"), "Bearer eyJhbGciOi.x.y");
    }

    #[test]
    fn token_with_space_passes_through() {
        assert_eq!(authorization_value("Bearer abc"), "Bearer abc");
        assert_eq!(authorization_value("Custom a b"), "Custom a b");
    }

    #[test]
    fn empty_token_still_gets_scheme() {
        assert_eq!(authorization_value(""), "Bearer ");
    }

    #[test]
    fn strip_scheme_keeps_foreign_schemes() {
        assert_eq!(strip_scheme("Basic Zm9v"), "Basic Zm9v");
        assert_eq!(strip_scheme("BEARER tok"), "tok");
    }

    #[test]
    fn strip_undoes_authorization_value() {
        for token in ["abc", "eyJ.x.y", "t0k3n"] {
            assert_eq!(strip_scheme(&authorization_value(token)), token);
        }
    }
}
