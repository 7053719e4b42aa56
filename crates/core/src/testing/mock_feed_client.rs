//! Mock community feed client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::feed::{Attachment, FeedClient, FeedError, FeedPost, PhotoRef};

/// Owner id the mock assigns to uploaded photos.
const PHOTO_OWNER_ID: i64 = -9000;

/// A published post as recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPost {
    pub message: String,
    /// Attachments in wire form, e.g. `"audio42_1"`.
    pub attachments: Vec<String>,
}

/// Mock implementation of the [`FeedClient`] trait.
///
/// Records posts, uploads and pin operations. Uploaded photos get sequential
/// ids starting at 1 under a fixed owner.
pub struct MockFeedClient {
    posts: Arc<RwLock<Vec<RecordedPost>>>,
    uploads: Arc<RwLock<Vec<Vec<u8>>>>,
    recent: Arc<RwLock<Vec<FeedPost>>>,
    pinned: Arc<RwLock<Vec<i64>>>,
    unpinned: Arc<RwLock<Vec<i64>>>,
    next_upload_error: Arc<RwLock<Option<FeedError>>>,
    next_post_error: Arc<RwLock<Option<FeedError>>>,
}

impl Default for MockFeedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFeedClient {
    /// Create a mock feed with no history.
    pub fn new() -> Self {
        Self {
            posts: Arc::new(RwLock::new(Vec::new())),
            uploads: Arc::new(RwLock::new(Vec::new())),
            recent: Arc::new(RwLock::new(Vec::new())),
            pinned: Arc::new(RwLock::new(Vec::new())),
            unpinned: Arc::new(RwLock::new(Vec::new())),
            next_upload_error: Arc::new(RwLock::new(None)),
            next_post_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Posts published through this mock, in order.
    pub async fn posts(&self) -> Vec<RecordedPost> {
        self.posts.read().await.clone()
    }

    /// Number of photo uploads performed.
    pub async fn upload_count(&self) -> usize {
        self.uploads.read().await.len()
    }

    /// Post ids pinned, in order.
    pub async fn pinned(&self) -> Vec<i64> {
        self.pinned.read().await.clone()
    }

    /// Post ids unpinned, in order.
    pub async fn unpinned(&self) -> Vec<i64> {
        self.unpinned.read().await.clone()
    }

    /// Owner id uploaded photos are attributed to.
    pub fn photo_owner_id(&self) -> i64 {
        PHOTO_OWNER_ID
    }

    /// Set what `recent_posts` returns.
    pub async fn set_recent_posts(&self, posts: Vec<FeedPost>) {
        *self.recent.write().await = posts;
    }

    /// Configure the next photo upload to fail with the given error.
    pub async fn set_next_upload_error(&self, error: FeedError) {
        *self.next_upload_error.write().await = Some(error);
    }

    /// Configure the next post to fail with the given error.
    pub async fn set_next_post_error(&self, error: FeedError) {
        *self.next_post_error.write().await = Some(error);
    }
}

#[async_trait]
impl FeedClient for MockFeedClient {
    async fn upload_photo(&self, bytes: Vec<u8>) -> Result<PhotoRef, FeedError> {
        if let Some(err) = self.next_upload_error.write().await.take() {
            return Err(err);
        }

        let mut uploads = self.uploads.write().await;
        uploads.push(bytes);
        Ok(PhotoRef {
            owner_id: PHOTO_OWNER_ID,
            photo_id: uploads.len() as i64,
        })
    }

    async fn post(&self, message: &str, attachments: &[Attachment]) -> Result<i64, FeedError> {
        if let Some(err) = self.next_post_error.write().await.take() {
            return Err(err);
        }

        let mut posts = self.posts.write().await;
        posts.push(RecordedPost {
            message: message.to_string(),
            attachments: attachments.iter().map(Attachment::to_string).collect(),
        });
        Ok(posts.len() as i64)
    }

    async fn recent_posts(&self, limit: u32) -> Result<Vec<FeedPost>, FeedError> {
        Ok(self
            .recent
            .read()
            .await
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn pin(&self, post_id: i64) -> Result<(), FeedError> {
        self.pinned.write().await.push(post_id);
        Ok(())
    }

    async fn unpin(&self, post_id: i64) -> Result<(), FeedError> {
        self.unpinned.write().await.push(post_id);
        Ok(())
    }
}
