//! Write-through fetcher in front of the response cache
//!
//! [`Client::fetch`] serves a URL from the cache when present, otherwise issues
//! a GET through its [`Transport`] and stores the body on success. Failed
//! requests are never cached and never retried here.

use bytes::Bytes;
use reqwest::StatusCode;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{Cache, CacheConfig};

/// Errors raised while fetching a resource over the network
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request did not complete within the configured timeout
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    /// Connection or transport failure
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Request to {url} returned {status}")]
    Status { url: String, status: StatusCode },

    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl NetworkError {
    fn from_reqwest(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            NetworkError::Timeout {
                url: url.to_string(),
            }
        } else {
            NetworkError::Request {
                url: url.to_string(),
                source,
            }
        }
    }

    /// The URL that failed, if the error is tied to a request
    pub fn url(&self) -> Option<&str> {
        match self {
            NetworkError::Timeout { url }
            | NetworkError::Request { url, .. }
            | NetworkError::Status { url, .. } => Some(url),
            NetworkError::ClientBuild(_) => None,
        }
    }
}

/// Issues a single GET and returns the full response body
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<Bytes, NetworkError>> + Send;
}

/// [`Transport`] backed by `reqwest` with a fixed request timeout
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetworkError::ClientBuild)?;
        Ok(Self { client })
    }

    /// Create a transport over a preconfigured `reqwest::Client`
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<Bytes, NetworkError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| NetworkError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .bytes()
            .await
            .map_err(|e| NetworkError::from_reqwest(url, e))
    }
}

/// Normalizes a URL for use as a cache key
///
/// Scheme and host case, default ports and an empty path are folded together.
/// Unparseable input is used verbatim; the transport will reject it anyway.
fn cache_key(url: &str) -> String {
    reqwest::Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

/// Resolves URLs to response bodies, memoizing successful fetches
#[derive(Debug)]
pub struct Client<T = HttpTransport> {
    cache: Cache,
    transport: T,
}

impl Client<HttpTransport> {
    /// Creates a client with an HTTP timeout and a cache expiring after `cache_interval`
    ///
    /// Must be called inside a Tokio runtime, since the cache spawns its reaper.
    pub fn new(timeout: Duration, cache_interval: Duration) -> Result<Self, NetworkError> {
        let transport = HttpTransport::new(timeout)?;
        Ok(Self::with_transport(
            transport,
            Cache::with_config(CacheConfig::uniform(cache_interval)),
        ))
    }
}

impl<T: Transport> Client<T> {
    /// Creates a client over any transport, owning the given cache
    pub fn with_transport(transport: T, cache: Cache) -> Self {
        Self { cache, transport }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Returns the body for `url`, from the cache when possible
    ///
    /// # Returns
    /// * `Ok(Bytes)` - Cached or freshly fetched body
    /// * `Err(NetworkError)` - The network request failed; the cache is left untouched
    pub async fn fetch(&self, url: &str) -> Result<Bytes, NetworkError> {
        let key = cache_key(url);
        if let Some(body) = self.cache.get(&key) {
            debug!(url, "Cache hit");
            return Ok(body);
        }

        debug!(url, "Cache miss, fetching");
        let body = match self.transport.get(url).await {
            Ok(body) => body,
            Err(e) => {
                warn!(url, error = %e, "Fetch failed");
                return Err(e);
            }
        };

        self.cache.add(key, body.clone());
        Ok(body)
    }

    /// Stops the cache reaper; see [`Cache::shutdown`]
    pub async fn shutdown(&mut self) {
        self.cache.shutdown().await;
    }
}
