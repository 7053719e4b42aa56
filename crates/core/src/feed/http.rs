//! HTTP community feed backend.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::FeedConfig;

use super::{Attachment, FeedClient, FeedError, FeedPost, PhotoRef};

const API_VERSION: &str = "5.131";

/// HTTP implementation of [`FeedClient`].
///
/// Photo upload is the service's three-step dance: request an upload URL,
/// push the bytes there as multipart form data, then save the staged photo
/// to the community wall.
pub struct HttpFeedClient {
    client: Client,
    config: FeedConfig,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    response: Option<T>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error_code: u32,
    error_msg: String,
}

#[derive(Debug, Deserialize)]
struct UploadServer {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct UploadResult {
    server: i64,
    photo: String,
    hash: String,
}

#[derive(Debug, Deserialize)]
struct SavedPhoto {
    id: i64,
    owner_id: i64,
}

#[derive(Debug, Deserialize)]
struct PostResult {
    post_id: i64,
}

#[derive(Debug, Deserialize)]
struct WallPage {
    #[serde(default)]
    items: Vec<RawPost>,
}

#[derive(Debug, Deserialize)]
struct RawPost {
    id: i64,
    #[serde(default)]
    likes: Option<Likes>,
    #[serde(default)]
    is_pinned: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct Likes {
    count: u64,
}

impl HttpFeedClient {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| FeedError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// The community id the photo endpoints want, always positive.
    fn group_id(&self) -> i64 {
        self.config.owner_id.abs()
    }

    fn method_url(&self, method: &str, params: &[(&str, String)]) -> String {
        let mut url = format!(
            "{}/method/{}?access_token={}&v={}",
            self.config.base_url.trim_end_matches('/'),
            method,
            self.config.access_token,
            API_VERSION,
        );
        for (key, value) in params {
            url.push('&');
            url.push_str(key);
            url.push('=');
            url.push_str(&urlencoding::encode(value));
        }
        url
    }

    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, FeedError> {
        let url = self.method_url(method, params);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FeedError::ConnectionFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedError::ApiError(format!(
                "HTTP {} from feed ({})",
                response.status(),
                method
            )));
        }

        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| FeedError::ApiError(e.to_string()))?;

        if let Some(err) = body.error {
            return Err(FeedError::ApiError(format!(
                "{} ({}, {})",
                err.error_msg, err.error_code, method
            )));
        }

        body.response
            .ok_or_else(|| FeedError::ApiError(format!("Empty response from {}", method)))
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn upload_photo(&self, bytes: Vec<u8>) -> Result<PhotoRef, FeedError> {
        let server: UploadServer = self
            .call(
                "photos.getWallUploadServer",
                &[("group_id", self.group_id().to_string())],
            )
            .await?;

        let part = Part::bytes(bytes)
            .file_name("cover.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| FeedError::UploadFailed(e.to_string()))?;
        let form = Form::new().part("photo", part);

        let upload: UploadResult = self
            .client
            .post(&server.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| FeedError::UploadFailed(e.to_string()))?
            .json()
            .await
            .map_err(|e| FeedError::UploadFailed(e.to_string()))?;

        if upload.photo.is_empty() || upload.photo == "[]" {
            return Err(FeedError::UploadFailed(
                "Upload server rejected the photo".to_string(),
            ));
        }

        let saved: Vec<SavedPhoto> = self
            .call(
                "photos.saveWallPhoto",
                &[
                    ("group_id", self.group_id().to_string()),
                    ("server", upload.server.to_string()),
                    ("photo", upload.photo),
                    ("hash", upload.hash),
                ],
            )
            .await?;

        let photo = saved
            .first()
            .ok_or_else(|| FeedError::UploadFailed("Save returned no photo".to_string()))?;

        debug!("Uploaded photo {}_{}", photo.owner_id, photo.id);
        Ok(PhotoRef {
            owner_id: photo.owner_id,
            photo_id: photo.id,
        })
    }

    async fn post(&self, message: &str, attachments: &[Attachment]) -> Result<i64, FeedError> {
        let joined = attachments
            .iter()
            .map(Attachment::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let result: PostResult = self
            .call(
                "wall.post",
                &[
                    ("owner_id", self.config.owner_id.to_string()),
                    ("from_group", "1".to_string()),
                    ("message", message.to_string()),
                    ("attachments", joined),
                ],
            )
            .await?;

        Ok(result.post_id)
    }

    async fn recent_posts(&self, limit: u32) -> Result<Vec<FeedPost>, FeedError> {
        let page: WallPage = self
            .call(
                "wall.get",
                &[
                    ("owner_id", self.config.owner_id.to_string()),
                    ("count", limit.to_string()),
                ],
            )
            .await?;

        Ok(page
            .items
            .into_iter()
            .map(|raw| FeedPost {
                id: raw.id,
                likes: raw.likes.map(|l| l.count).unwrap_or(0),
                pinned: raw.is_pinned == Some(1),
            })
            .collect())
    }

    async fn pin(&self, post_id: i64) -> Result<(), FeedError> {
        let _: u8 = self
            .call(
                "wall.pin",
                &[
                    ("owner_id", self.config.owner_id.to_string()),
                    ("post_id", post_id.to_string()),
                ],
            )
            .await?;
        Ok(())
    }

    async fn unpin(&self, post_id: i64) -> Result<(), FeedError> {
        let _: u8 = self
            .call(
                "wall.unpin",
                &[
                    ("owner_id", self.config.owner_id.to_string()),
                    ("post_id", post_id.to_string()),
                ],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpFeedClient {
        HttpFeedClient::new(FeedConfig {
            base_url: "https://feed.example.com/".to_string(),
            access_token: "tok".to_string(),
            owner_id: -12345,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_method_url() {
        let url = client().method_url(
            "wall.post",
            &[
                ("owner_id", "-12345".to_string()),
                ("message", "a b".to_string()),
            ],
        );
        assert!(url.starts_with("https://feed.example.com/method/wall.post?access_token=tok"));
        assert!(url.contains("&owner_id=-12345"));
        assert!(url.contains("&message=a%20b"));
        assert!(!url.contains("com//method"));
    }

    #[test]
    fn test_group_id_is_positive() {
        assert_eq!(client().group_id(), 12345);
    }

    #[test]
    fn test_wall_page_parsing() {
        let json = r#"{"response":{"items":[
            {"id":10,"likes":{"count":3},"is_pinned":1},
            {"id":9,"likes":{"count":8}}
        ]}}"#;
        let parsed: ApiResponse<WallPage> = serde_json::from_str(json).unwrap();
        let items = parsed.response.unwrap().items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].is_pinned, Some(1));
        assert_eq!(items[1].likes.as_ref().map(|l| l.count), Some(8));
    }

    #[test]
    fn test_error_body_parsing() {
        let json = r#"{"error":{"error_code":15,"error_msg":"Access denied"}}"#;
        let parsed: ApiResponse<PostResult> = serde_json::from_str(json).unwrap();
        let err = parsed.error.unwrap();
        assert_eq!(err.error_code, 15);
        assert_eq!(err.error_msg, "Access denied");
    }
}
