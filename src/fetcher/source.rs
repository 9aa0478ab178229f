use async_trait::async_trait;

use crate::fetcher::{errors::FetchError, types::FetchedPage};

/// Anything that can hand out a decoded page for a URL.
///
/// The crawler and page discovery only talk to this trait, so the HTTP client
/// can be swapped for a canned source in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_page(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
