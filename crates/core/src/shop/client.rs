//! HTTP client for the shop site.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::catalog::{FetchError, PageFetcher, ReleaseSummary};
use crate::config::CatalogConfig;

use super::{parse, ReleaseDetails, ReleaseFetcher};

/// Fetches and parses shop pages. Implements both sides of the site:
/// listing pages for the crawler and release pages for the publisher.
pub struct ShopClient {
    client: Client,
    base_url: String,
}

impl ShopClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))
    }
}

#[async_trait]
impl PageFetcher for ShopClient {
    async fn fetch_page(&self, url: &str) -> Result<Vec<ReleaseSummary>, FetchError> {
        let html = self.get_html(url).await?;
        Ok(parse::parse_listing(&html, &self.base_url))
    }
}

#[async_trait]
impl ReleaseFetcher for ShopClient {
    async fn details(&self, link: &str) -> Result<ReleaseDetails, FetchError> {
        let html = self.get_html(link).await?;
        parse::parse_details(&html)
            .ok_or_else(|| FetchError::Parse(format!("No release metadata at {}", link)))
    }

    async fn tracks(&self, link: &str) -> Result<Vec<String>, FetchError> {
        let html = self.get_html(link).await?;
        Ok(parse::parse_tracks(&html))
    }

    async fn images(&self, link: &str) -> Result<Vec<String>, FetchError> {
        let html = self.get_html(link).await?;
        Ok(parse::parse_images(&html, &self.base_url))
    }

    async fn image_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Http(format!(
                "HTTP {} for {}",
                response.status(),
                url
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
