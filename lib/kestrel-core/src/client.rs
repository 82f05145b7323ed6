//! The transport seam.
//!
//! [`HttpClient`] performs one buffered exchange. The typed service clients
//! are generic over it, so the hyper transport, the in-process loopback, or
//! a test double can carry the same encoded requests.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;

use crate::{Request, Response, Result};

/// Core HTTP client trait.
///
/// Implementations return the response for every status; mapping statuses
/// to outcomes is the decoder's job.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange itself fails:
    /// - Network errors
    /// - Timeouts
    /// - Malformed responses
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send;
}

impl<C: HttpClient> HttpClient for Arc<C> {
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Response<Bytes>>> + Send {
        C::execute(self, request)
    }
}
