//! Types for catalogue discovery.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crawl priority tier for a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionTier {
    /// Fresh/important content, always scanned first ("new", "this week", ...).
    Primary,
    /// Archival and genre sections, scanned after the primary tier.
    Secondary,
}

/// A paginated crawl source.
#[derive(Debug, Clone)]
pub struct Section {
    /// Page-URL template containing a `{page}` placeholder.
    pub template: String,
    /// Priority tier.
    pub tier: SectionTier,
}

impl Section {
    pub fn new(template: impl Into<String>, tier: SectionTier) -> Self {
        Self {
            template: template.into(),
            tier,
        }
    }

    /// The template with the query string stripped.
    ///
    /// Used as the exhaustion key so a section listed in both tiers is
    /// pruned everywhere once its pagination runs dry.
    pub fn base(&self) -> &str {
        self.template.split('?').next().unwrap_or(&self.template)
    }

    /// Concrete URL for the given page number.
    pub fn page_url(&self, page: u32) -> String {
        self.template.replace("{page}", &page.to_string())
    }
}

/// One release as listed on a catalogue page.
///
/// Only the link is authoritative; the publisher re-reads the release page
/// for tracks, images and display metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSummary {
    /// Canonical release link, the dedup identifier.
    pub link: String,
    /// Artist as listed.
    pub artist: String,
    /// Title as listed.
    pub title: String,
}

/// Errors from fetching or parsing a catalogue page.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Failed to parse page: {0}")]
    Parse(String),
}

/// Trait for catalogue page fetching backends.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one listing page and return the releases on it, in page order.
    ///
    /// An empty vec means the section has paginated past its last real page.
    async fn fetch_page(&self, url: &str) -> Result<Vec<ReleaseSummary>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_substitution() {
        let section = Section::new(
            "https://shop.example.com/this-week/?page={page}",
            SectionTier::Primary,
        );
        assert_eq!(
            section.page_url(3),
            "https://shop.example.com/this-week/?page=3"
        );
    }

    #[test]
    fn test_base_strips_query() {
        let section = Section::new(
            "https://shop.example.com/this-week/?page={page}",
            SectionTier::Secondary,
        );
        assert_eq!(section.base(), "https://shop.example.com/this-week/");
    }

    #[test]
    fn test_base_without_query() {
        let section = Section::new("https://shop.example.com/plain", SectionTier::Primary);
        assert_eq!(section.base(), "https://shop.example.com/plain");
    }
}
