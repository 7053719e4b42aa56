//! Mock release page fetcher for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::catalog::FetchError;
use crate::shop::{ReleaseDetails, ReleaseFetcher};

#[derive(Debug, Clone)]
struct MockRelease {
    details: ReleaseDetails,
    tracks: Vec<String>,
    images: Vec<String>,
}

/// Mock implementation of the [`ReleaseFetcher`] trait.
///
/// Releases are configured per link; reading an unconfigured link fails the
/// way a vanished page would. Every fetch is counted so tests can assert a
/// skipped release cost zero page reads.
pub struct MockReleaseFetcher {
    releases: Arc<RwLock<HashMap<String, MockRelease>>>,
    /// Total fetches across all methods.
    fetches: Arc<RwLock<usize>>,
    /// If set, the next image byte download fails with this error.
    next_image_error: Arc<RwLock<Option<FetchError>>>,
}

impl Default for MockReleaseFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MockReleaseFetcher {
    /// Create a mock fetcher with no releases.
    pub fn new() -> Self {
        Self {
            releases: Arc::new(RwLock::new(HashMap::new())),
            fetches: Arc::new(RwLock::new(0)),
            next_image_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Configure a release behind a link.
    pub async fn set_release(
        &self,
        link: &str,
        title: &str,
        label: &str,
        tracks: Vec<String>,
        images: Vec<String>,
    ) {
        self.releases.write().await.insert(
            link.to_string(),
            MockRelease {
                details: ReleaseDetails {
                    title: title.to_string(),
                    label: label.to_string(),
                },
                tracks,
                images,
            },
        );
    }

    /// Replace the cover images of an already configured release.
    pub async fn set_images(&self, link: &str, images: Vec<String>) {
        if let Some(release) = self.releases.write().await.get_mut(link) {
            release.images = images;
        }
    }

    /// Configure the next image download to fail with the given error.
    pub async fn set_next_image_error(&self, error: FetchError) {
        *self.next_image_error.write().await = Some(error);
    }

    /// Total number of fetch calls across all methods.
    pub async fn fetch_count(&self) -> usize {
        *self.fetches.read().await
    }

    async fn lookup(&self, link: &str) -> Result<MockRelease, FetchError> {
        *self.fetches.write().await += 1;
        self.releases
            .read()
            .await
            .get(link)
            .cloned()
            .ok_or_else(|| FetchError::Http(format!("HTTP 404 for {}", link)))
    }
}

#[async_trait]
impl ReleaseFetcher for MockReleaseFetcher {
    async fn details(&self, link: &str) -> Result<ReleaseDetails, FetchError> {
        Ok(self.lookup(link).await?.details)
    }

    async fn tracks(&self, link: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.lookup(link).await?.tracks)
    }

    async fn images(&self, link: &str) -> Result<Vec<String>, FetchError> {
        Ok(self.lookup(link).await?.images)
    }

    async fn image_bytes(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(err) = self.next_image_error.write().await.take() {
            return Err(err);
        }
        *self.fetches.write().await += 1;
        Ok(vec![0xFF, 0xD8, 0xFF, 0xE0])
    }
}
