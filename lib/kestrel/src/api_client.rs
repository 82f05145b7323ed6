//! Generic API client wrapper.
//!
//! [`ApiClient`] pairs any [`HttpClient`] with the base URL of the services
//! and runs the shared call pipeline of every typed client: send the encoded
//! request, wrap transport failures, decode through the endpoint's status
//! table.

use bytes::Bytes;
use kestrel_core::dispatch::ResponseTable;
use tracing::{Instrument, debug, debug_span, warn};
use url::Url;

use crate::{Error, HttpClient, Request, Result};

/// Generic API client wrapper.
///
/// # Example
///
/// ```
/// use kestrel::{ApiClient, HyperClient};
///
/// let api = ApiClient::new(HyperClient::new(), "http://localhost:8080")
///     .expect("valid URL")
///     .restore_body(true);
/// assert_eq!(api.base_url().as_str(), "http://localhost:8080/");
/// ```
#[derive(Debug, Clone)]
pub struct ApiClient<C> {
    client: C,
    base_url: Url,
    restore_body: bool,
}

impl<C> ApiClient<C> {
    /// Create a new API client with the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(client: C, base_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self::with_url(
            client,
            Url::parse(base_url.as_ref()).map_err(Error::InvalidUrl)?,
        ))
    }

    /// Create a new API client with a pre-parsed URL.
    #[must_use]
    pub fn with_url(client: C, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            restore_body: false,
        }
    }

    /// Keep response bodies readable after decoding and trace them at
    /// debug level.
    #[must_use]
    pub const fn restore_body(mut self, restore_body: bool) -> Self {
        self.restore_body = restore_body;
        self
    }

    /// Base URL every endpoint path is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get a reference to the inner HTTP client.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.client
    }

    /// Consume the wrapper and return the inner HTTP client.
    #[must_use]
    pub fn into_inner(self) -> C {
        self.client
    }
}

impl<C: HttpClient> ApiClient<C> {
    /// Send an encoded request and decode the response through `table`.
    ///
    /// # Errors
    ///
    /// - [`Error::Request`] when the transport fails
    /// - any error of [`ResponseTable::decode`]
    pub async fn call<T: 'static>(
        &self,
        table: &'static ResponseTable<T>,
        request: Request<Bytes>,
    ) -> Result<T> {
        let endpoint = table.endpoint();
        let span = debug_span!(
            "kestrel_call",
            service = endpoint.service(),
            method = endpoint.method()
        );

        async move {
            debug!(http.method = %request.method(), url = %request.url(), "sending request");
            let response = self.client.execute(request).await.map_err(|err| {
                warn!(error = %err, "request failed");
                Error::request(endpoint, err)
            })?;
            debug!(status = response.status(), "response received");

            let result = table.decode(&response);
            match &result {
                Ok(_) => {}
                Err(Error::Service(error)) => debug!(kind = error.kind(), "service error"),
                Err(err) => warn!(error = %err, "response rejected"),
            }

            if self.restore_body {
                debug!(body = %response.text_lossy(), "response body");
            }
            result
        }
        .instrument(span)
        .await
    }
}
