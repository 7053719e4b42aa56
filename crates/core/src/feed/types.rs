//! Types for the community feed.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Hard cap on attachments per post, imposed by the feed service.
pub const MAX_ATTACHMENTS: usize = 10;

/// A photo hosted by the feed service, ready to attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoRef {
    pub owner_id: i64,
    pub photo_id: i64,
}

/// A post as returned by the feed's recent-post listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    pub id: i64,
    pub likes: u64,
    pub pinned: bool,
}

/// An attachment reference in the feed's wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Audio { owner_id: i64, audio_id: i64 },
    Photo { owner_id: i64, photo_id: i64 },
}

impl fmt::Display for Attachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attachment::Audio { owner_id, audio_id } => {
                write!(f, "audio{}_{}", owner_id, audio_id)
            }
            Attachment::Photo { owner_id, photo_id } => {
                write!(f, "photo{}_{}", owner_id, photo_id)
            }
        }
    }
}

/// Errors from the feed service.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Feed connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Feed API error: {0}")]
    ApiError(String),

    #[error("Photo upload failed: {0}")]
    UploadFailed(String),
}

/// Trait for community feed backends.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Upload an image to the feed's photo storage.
    async fn upload_photo(&self, bytes: Vec<u8>) -> Result<PhotoRef, FeedError>;

    /// Publish a post, returning its id.
    async fn post(&self, message: &str, attachments: &[Attachment]) -> Result<i64, FeedError>;

    /// The community's most recent posts, newest first.
    async fn recent_posts(&self, limit: u32) -> Result<Vec<FeedPost>, FeedError>;

    async fn pin(&self, post_id: i64) -> Result<(), FeedError>;

    async fn unpin(&self, post_id: i64) -> Result<(), FeedError>;
}
