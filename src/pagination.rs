//! Forward/backward traversal over the paginated location-area listing
//!
//! The cursor only holds the `next`/`previous` links of the last page shown.
//! Revisiting a page within the cache window is served from the response
//! cache, so walking back and forth does not hit the network again.

use thiserror::Error;

use crate::data::{ApiError, LocationAreaPage, PokeApiClient, Transport};

/// Errors raised while paging through location areas
#[derive(Debug, Error)]
pub enum PageError {
    /// There is no page before the current one
    #[error("you're on the first page")]
    FirstPage,

    /// There is no page after the current one
    #[error("you're on the last page")]
    LastPage,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Caller-held pagination state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Link to the page after the current one
    pub next: Option<String>,
    /// Link to the page before the current one
    pub previous: Option<String>,
    /// Whether any page has been shown yet
    started: bool,
}

impl PageCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// URL for the next page: `Ok(None)` means the first page (root URL)
    pub fn forward_url(&self) -> Result<Option<&str>, PageError> {
        match (&self.next, self.started) {
            (Some(next), _) => Ok(Some(next.as_str())),
            (None, false) => Ok(None),
            (None, true) => Err(PageError::LastPage),
        }
    }

    /// URL for the previous page
    pub fn backward_url(&self) -> Result<&str, PageError> {
        self.previous.as_deref().ok_or(PageError::FirstPage)
    }

    /// Records the links of a freshly shown page
    pub fn update(&mut self, page: &LocationAreaPage) {
        self.next = page.next.clone();
        self.previous = page.previous.clone();
        self.started = true;
    }

    /// Fetches the next page and advances the cursor
    pub async fn forward<T: Transport>(
        &mut self,
        api: &PokeApiClient<T>,
    ) -> Result<LocationAreaPage, PageError> {
        let url = self.forward_url()?.map(str::to_owned);
        let page = api.list_location_areas(url.as_deref()).await?;
        self.update(&page);
        Ok(page)
    }

    /// Fetches the previous page and moves the cursor back
    ///
    /// Fails with [`PageError::FirstPage`] before any request is made when
    /// there is no previous link.
    pub async fn backward<T: Transport>(
        &mut self,
        api: &PokeApiClient<T>,
    ) -> Result<LocationAreaPage, PageError> {
        let url = self.backward_url()?.to_owned();
        let page = api.list_location_areas(Some(&url)).await?;
        self.update(&page);
        Ok(page)
    }
}
