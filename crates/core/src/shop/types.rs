//! Release page abstraction.

use async_trait::async_trait;

use crate::catalog::FetchError;

/// Display metadata scraped from a release page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseDetails {
    /// Display title in `"Artist: Title"` form.
    pub title: String,
    /// Attributed record label.
    pub label: String,
}

/// Trait for reading individual release pages.
#[async_trait]
pub trait ReleaseFetcher: Send + Sync {
    /// Display metadata for the release.
    async fn details(&self, link: &str) -> Result<ReleaseDetails, FetchError>;

    /// Track titles in `"Artist: Title"` form, page order, de-duplicated.
    ///
    /// Empty for listings without audio (merchandise, clothing).
    async fn tracks(&self, link: &str) -> Result<Vec<String>, FetchError>;

    /// Cover image URLs for the release.
    async fn images(&self, link: &str) -> Result<Vec<String>, FetchError>;

    /// Raw bytes of a cover image.
    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
