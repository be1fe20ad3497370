//! PokeAPI client
//!
//! Builds resource URLs, fetches them through the caching [`Client`] and
//! decodes the JSON bodies into data records.

use serde::de::DeserializeOwned;
use thiserror::Error;

use super::fetcher::{Client, HttpTransport, NetworkError, Transport};
use super::{LocationArea, LocationAreaPage, Pokemon};

/// Base URL for the PokeAPI
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Page size of the location-area listing
const PAGE_LIMIT: u32 = 20;

/// Errors that can occur when fetching PokeAPI data
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network request failed
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Failed to parse JSON response
    #[error("Failed to parse response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Client for location areas and pokemon
#[derive(Debug)]
pub struct PokeApiClient<T = HttpTransport> {
    client: Client<T>,
    base_url: String,
}

impl<T: Transport> PokeApiClient<T> {
    /// Wraps a fetcher; `base_url` has no trailing slash (e.g. [`DEFAULT_BASE_URL`])
    pub fn new(client: Client<T>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn client(&self) -> &Client<T> {
        &self.client
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the first location-area page
    ///
    /// Spelled the same way the API writes `previous` links, so stepping back
    /// to the first page reuses the cached response.
    pub fn location_areas_url(&self) -> String {
        format!(
            "{}/location-area?offset=0&limit={}",
            self.base_url, PAGE_LIMIT
        )
    }

    /// Fetches a page of location areas
    ///
    /// # Arguments
    /// * `url` - A `next`/`previous` link from an earlier page, or `None` for the first page
    pub async fn list_location_areas(&self, url: Option<&str>) -> Result<LocationAreaPage, ApiError> {
        match url {
            Some(url) => self.fetch_json(url).await,
            None => self.fetch_json(&self.location_areas_url()).await,
        }
    }

    /// Fetches a single location area by name or id
    pub async fn location_area(&self, name: &str) -> Result<LocationArea, ApiError> {
        let url = format!("{}/location-area/{}", self.base_url, name);
        self.fetch_json(&url).await
    }

    /// Fetches a pokemon by name or id
    pub async fn pokemon(&self, name: &str) -> Result<Pokemon, ApiError> {
        let url = format!("{}/pokemon/{}", self.base_url, name);
        self.fetch_json(&url).await
    }

    async fn fetch_json<D: DeserializeOwned>(&self, url: &str) -> Result<D, ApiError> {
        let body = self.client.fetch(url).await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Stops the underlying cache reaper
    pub async fn shutdown(&mut self) {
        self.client.shutdown().await;
    }
}
