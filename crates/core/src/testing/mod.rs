//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides mock implementations of all external collaborator
//! traits, allowing full pipeline testing without a live shop, index or feed.
//!
//! # Example
//!
//! ```rust,ignore
//! use waxpost_core::testing::{MockAudioIndex, MockFeedClient, MockReleaseFetcher};
//!
//! let index = MockAudioIndex::new();
//! let feed = MockFeedClient::new();
//!
//! // Configure mock responses
//! index.set_results("Maurizio: M4", vec![/* entries */]).await;
//!
//! // Wire into a Publisher...
//! ```

mod mock_audio_index;
mod mock_feed_client;
mod mock_page_fetcher;
mod mock_release_fetcher;

pub use mock_audio_index::MockAudioIndex;
pub use mock_feed_client::{MockFeedClient, RecordedPost};
pub use mock_page_fetcher::MockPageFetcher;
pub use mock_release_fetcher::MockReleaseFetcher;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::ReleaseSummary;
    use crate::feed::FeedPost;
    use crate::index::IndexEntry;

    /// Create a listing entry for a release link.
    pub fn release_summary(link: &str, artist: &str, title: &str) -> ReleaseSummary {
        ReleaseSummary {
            link: link.to_string(),
            artist: artist.to_string(),
            title: title.to_string(),
        }
    }

    /// Create an index entry whose display form is `"artist: title"`.
    pub fn index_entry(artist: &str, title: &str, owner_id: i64, track_id: i64) -> IndexEntry {
        IndexEntry {
            artist: artist.to_string(),
            title: title.to_string(),
            owner_id,
            track_id,
        }
    }

    /// Create a feed post with the given like count.
    pub fn feed_post(id: i64, likes: u64, pinned: bool) -> FeedPost {
        FeedPost { id, likes, pinned }
    }
}
