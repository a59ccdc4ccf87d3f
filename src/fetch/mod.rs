//! Resource fetching.
//!
//! One HTTP GET per request, no retries and no caching. The client (with its
//! TLS policy) is built once at startup and injected here.

mod request;
mod response;

use std::sync::Arc;

use log::debug;
use url::Url;

use crate::error_handling::GatewayError;
use request::RequestHeaders;

pub use response::FetchedResource;

/// Performs the outbound fetch for a request.
#[derive(Clone)]
pub struct Fetcher {
    client: Arc<reqwest::Client>,
}

impl Fetcher {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self { client }
    }

    /// Fetches `target` and reads the whole body into memory.
    ///
    /// Non-2xx responses are not errors: their body is rendered like any
    /// other page.
    ///
    /// # Errors
    ///
    /// - `GatewayError::Resolve` if `target` is not a valid absolute URL
    /// - `GatewayError::Fetch` on transport failure (DNS, connect, TLS, timeout)
    /// - `GatewayError::BodyRead` if the body stream fails part way
    pub async fn fetch(&self, target: &str) -> Result<FetchedResource, GatewayError> {
        let url = Url::parse(target).map_err(|source| GatewayError::Resolve {
            url: target.to_string(),
            source,
        })?;

        let response = RequestHeaders::apply_to_request_builder(self.client.get(url.clone()))
            .send()
            .await
            .map_err(|source| GatewayError::Fetch {
                url: target.to_string(),
                source,
            })?;

        debug!(
            "Fetched {target}: status {}, final url {}",
            response.status(),
            response.url()
        );

        let mime_type = response::extract_mime_type(response.headers());

        let body = response
            .bytes()
            .await
            .map_err(|source| GatewayError::BodyRead {
                url: target.to_string(),
                source,
            })?;

        debug!(
            "Body length for {target}: {} bytes (MIME type '{mime_type}')",
            body.len()
        );

        Ok(FetchedResource::new(url, mime_type, body.to_vec()))
    }
}
