//! Security collaborators of the server codec.
//!
//! Token verification is not done here: every scoped operation hands the
//! bearer token and its [`JwtScheme`] to an [`Authenticator`], which either
//! enriches the request [`Context`] or refuses the call with a
//! [`ServiceError`] (typically `not-authorized` or `invalid-scopes`).

use kestrel_core::ServiceError;

/// Per-request values made available to service implementations.
///
/// A typed map: at most one value per type. Authenticators use it to pass
/// verified claims along.
#[derive(Debug, Clone, Default)]
pub struct Context {
    extensions: http::Extensions,
}

impl Context {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value`, returning the previous value of the same type.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.extensions.insert(value)
    }

    /// Builder-style [`Context::insert`].
    #[must_use]
    pub fn with<T: Clone + Send + Sync + 'static>(mut self, value: T) -> Self {
        self.extensions.insert(value);
        self
    }

    /// The stored value of type `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions.get::<T>()
    }
}

/// The JWT security requirement of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JwtScheme {
    /// Scheme name.
    pub name: &'static str,
    /// Every scope the scheme declares.
    pub scopes: &'static [&'static str],
    /// Scopes the operation requires.
    pub required_scopes: &'static [&'static str],
}

impl JwtScheme {
    /// Returns the required scopes missing from `granted`.
    #[must_use]
    pub fn missing_scopes(&self, granted: &[&str]) -> Vec<&'static str> {
        self.required_scopes
            .iter()
            .copied()
            .filter(|scope| !granted.contains(scope))
            .collect()
    }
}

/// The authentication callback invoked before every scoped operation.
pub trait Authenticator: Send + Sync {
    /// Verify `token` against `scheme`.
    ///
    /// # Errors
    ///
    /// Returns the typed error to answer with when the call is refused.
    fn authenticate(
        &self,
        context: Context,
        token: &str,
        scheme: &JwtScheme,
    ) -> Result<Context, ServiceError>;
}

impl<F> Authenticator for F
where
    F: Fn(Context, &str, &JwtScheme) -> Result<Context, ServiceError> + Send + Sync,
{
    fn authenticate(
        &self,
        context: Context,
        token: &str,
        scheme: &JwtScheme,
    ) -> Result<Context, ServiceError> {
        self(context, token, scheme)
    }
}
