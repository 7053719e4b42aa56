//! HTTP audio index backend.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::IndexConfig;

use super::{AudioIndex, IndexEntry, IndexError};

/// API error codes the service uses for flood control / cooldown.
const DEGRADED_CODES: &[u32] = &[6, 9, 29];

/// HTTP implementation of [`AudioIndex`].
pub struct HttpAudioIndex {
    client: Client,
    config: IndexConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    response: Option<SearchItems>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct SearchItems {
    #[serde(default)]
    items: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
struct RawEntry {
    artist: String,
    title: String,
    owner_id: i64,
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: u32,
    error_msg: String,
}

impl HttpAudioIndex {
    pub fn new(config: IndexConfig) -> Result<Self, IndexError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| IndexError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/method/audio.search?q={}&access_token={}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(query),
            self.config.access_token,
        )
    }
}

#[async_trait]
impl AudioIndex for HttpAudioIndex {
    fn name(&self) -> &str {
        "http"
    }

    async fn search(&self, query: &str) -> Result<Vec<IndexEntry>, IndexError> {
        let url = self.search_url(query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IndexError::ConnectionFailed(e.to_string()))?;

        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(IndexError::ServiceDegraded(
                "HTTP 429 from index".to_string(),
            ));
        }
        if !response.status().is_success() {
            return Err(IndexError::ApiError(format!(
                "HTTP {} from index",
                response.status()
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| IndexError::ApiError(e.to_string()))?;

        if let Some(err) = body.error {
            if DEGRADED_CODES.contains(&err.error_code) {
                warn!("Index flood control: {} ({})", err.error_msg, err.error_code);
                return Err(IndexError::ServiceDegraded(err.error_msg));
            }
            return Err(IndexError::ApiError(format!(
                "{} ({})",
                err.error_msg, err.error_code
            )));
        }

        let items = body.response.map(|r| r.items).unwrap_or_default();
        debug!("Index returned {} candidates for {:?}", items.len(), query);

        Ok(items
            .into_iter()
            .map(|raw| IndexEntry {
                artist: raw.artist,
                title: raw.title,
                owner_id: raw.owner_id,
                track_id: raw.id,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> HttpAudioIndex {
        HttpAudioIndex::new(IndexConfig {
            base_url: "https://index.example.com/".to_string(),
            access_token: "tok".to_string(),
            search_delay_secs: 7,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = index().search_url("Maurizio: M4 / remix");
        assert!(url.starts_with("https://index.example.com/method/audio.search?q="));
        assert!(url.contains("Maurizio%3A%20M4%20%2F%20remix"));
        assert!(url.ends_with("&access_token=tok"));
        assert!(!url.contains("com//method"));
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{"response":{"items":[
            {"artist":"Maurizio","title":"M4","owner_id":42,"id":7}
        ]}}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let items = parsed.response.unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].owner_id, 42);
        assert_eq!(items[0].id, 7);
    }

    #[test]
    fn test_error_body_parsing() {
        let json = r#"{"error":{"error_code":6,"error_msg":"Too many requests"}}"#;
        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        let err = parsed.error.unwrap();
        assert!(DEGRADED_CODES.contains(&err.error_code));
    }
}
