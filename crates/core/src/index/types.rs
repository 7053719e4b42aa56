//! Types for the external audio index.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One search hit from the index, in the service's own relevance order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Artist as known to the index.
    pub artist: String,
    /// Track title as known to the index.
    pub title: String,
    /// Owner of the hosted audio.
    pub owner_id: i64,
    /// Track identifier within the owner's collection.
    pub track_id: i64,
}

impl IndexEntry {
    /// The `"artist: title"` form the matcher compares against.
    pub fn display(&self) -> String {
        format!("{}: {}", self.artist, self.title)
    }
}

/// Errors from the audio index.
///
/// Any of these is fatal to the run: an erroring search backend means the
/// service is degraded or cooling us down, and hammering it makes it worse.
/// Empty results are not an error.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Index connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Index API error: {0}")]
    ApiError(String),

    #[error("Index service degraded, stop querying: {0}")]
    ServiceDegraded(String),
}

/// Trait for audio index search backends.
#[async_trait]
pub trait AudioIndex: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fuzzy-search the index, returning candidates ranked by the service.
    async fn search(&self, query: &str) -> Result<Vec<IndexEntry>, IndexError>;
}
