//! Pinned-post upkeep.

use tracing::{debug, info};

use super::{FeedClient, FeedError};

/// Keep the community's most-liked recent post pinned.
///
/// Scans the `scan_depth` most recent posts, and when the most-liked one is
/// not already pinned, swaps the pin over to it. A failure here only costs
/// the pin refresh; callers log it and carry on with the publish run.
pub async fn refresh_pinned_post(
    feed: &dyn FeedClient,
    scan_depth: u32,
) -> Result<(), FeedError> {
    let posts = feed.recent_posts(scan_depth).await?;

    let Some(most_liked) = posts.iter().max_by_key(|p| p.likes) else {
        debug!("No recent posts, nothing to pin");
        return Ok(());
    };

    if most_liked.pinned {
        debug!(
            "Post {} already pinned with {} likes",
            most_liked.id, most_liked.likes
        );
        return Ok(());
    }

    if let Some(pinned) = posts.iter().find(|p| p.pinned) {
        feed.unpin(pinned.id).await?;
    }
    feed.pin(most_liked.id).await?;

    info!(
        "Pinned post {} with {} likes",
        most_liked.id, most_liked.likes
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedPost;
    use crate::testing::MockFeedClient;

    fn post(id: i64, likes: u64, pinned: bool) -> FeedPost {
        FeedPost { id, likes, pinned }
    }

    #[tokio::test]
    async fn test_swaps_pin_to_most_liked() {
        let feed = MockFeedClient::new();
        feed.set_recent_posts(vec![post(3, 1, false), post(2, 9, false), post(1, 4, true)])
            .await;

        refresh_pinned_post(&feed, 35).await.unwrap();

        assert_eq!(feed.unpinned().await, vec![1]);
        assert_eq!(feed.pinned().await, vec![2]);
    }

    #[tokio::test]
    async fn test_pins_without_unpin_when_nothing_is_pinned() {
        let feed = MockFeedClient::new();
        feed.set_recent_posts(vec![post(3, 1, false), post(2, 9, false)])
            .await;

        refresh_pinned_post(&feed, 35).await.unwrap();

        assert!(feed.unpinned().await.is_empty());
        assert_eq!(feed.pinned().await, vec![2]);
    }

    #[tokio::test]
    async fn test_leaves_an_already_correct_pin_alone() {
        let feed = MockFeedClient::new();
        feed.set_recent_posts(vec![post(3, 1, false), post(2, 9, true)])
            .await;

        refresh_pinned_post(&feed, 35).await.unwrap();

        assert!(feed.unpinned().await.is_empty());
        assert!(feed.pinned().await.is_empty());
    }

    #[tokio::test]
    async fn test_empty_feed_is_a_no_op() {
        let feed = MockFeedClient::new();
        refresh_pinned_post(&feed, 35).await.unwrap();
        assert!(feed.pinned().await.is_empty());
    }
}
