//! Endpoint identity carried by every wrapped error.

use std::fmt;

/// Identifies one operation of one service, e.g. `aspect.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    service: &'static str,
    method: &'static str,
}

impl Endpoint {
    /// Create a new endpoint name.
    #[must_use]
    pub const fn new(service: &'static str, method: &'static str) -> Self {
        Self { service, method }
    }

    /// The service name (e.g. `aspect`).
    #[must_use]
    pub const fn service(&self) -> &'static str {
        self.service
    }

    /// The method name (e.g. `list`).
    #[must_use]
    pub const fn method(&self) -> &'static str {
        self.method
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.service, self.method)
    }
}
