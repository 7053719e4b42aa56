//! Mock catalogue page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::{FetchError, PageFetcher, ReleaseSummary};

/// Mock implementation of the [`PageFetcher`] trait.
///
/// Pages are configured per URL; any URL without a configured page fetches
/// as empty, which the crawler reads as an exhausted section. Fetched URLs
/// are recorded for assertions about crawl order and pruning.
pub struct MockPageFetcher {
    /// Configured pages by URL.
    pages: Arc<RwLock<HashMap<String, Vec<ReleaseSummary>>>>,
    /// Every URL fetched, in order.
    fetched: Arc<RwLock<Vec<String>>>,
    /// If set, the next fetch fails with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
}

impl Default for MockPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPageFetcher {
    /// Create a mock fetcher where every page is empty.
    pub fn new() -> Self {
        Self {
            pages: Arc::new(RwLock::new(HashMap::new())),
            fetched: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the releases a URL fetches as.
    pub async fn set_page(&self, url: &str, releases: Vec<ReleaseSummary>) {
        self.pages.write().await.insert(url.to_string(), releases);
    }

    /// URLs fetched so far, in order.
    pub async fn fetched_urls(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch_page(&self, url: &str) -> Result<Vec<ReleaseSummary>, FetchError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.fetched.write().await.push(url.to_string());

        Ok(self
            .pages
            .read()
            .await
            .get(url)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_unknown_url_fetches_empty() {
        let fetcher = MockPageFetcher::new();
        let releases = fetcher.fetch_page("https://s/a/?page=1").await.unwrap();
        assert!(releases.is_empty());
        assert_eq!(fetcher.fetched_urls().await, vec!["https://s/a/?page=1"]);
    }

    #[tokio::test]
    async fn test_configured_page_is_returned() {
        let fetcher = MockPageFetcher::new();
        fetcher
            .set_page(
                "https://s/a/?page=1",
                vec![fixtures::release_summary("https://s/1", "A", "T")],
            )
            .await;

        let releases = fetcher.fetch_page("https://s/a/?page=1").await.unwrap();
        assert_eq!(releases.len(), 1);
    }

    #[tokio::test]
    async fn test_error_is_consumed() {
        let fetcher = MockPageFetcher::new();
        fetcher
            .set_next_error(FetchError::Http("boom".to_string()))
            .await;

        assert!(fetcher.fetch_page("https://s/a/?page=1").await.is_err());
        assert!(fetcher.fetch_page("https://s/a/?page=1").await.is_ok());
    }
}
