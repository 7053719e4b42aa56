//! Pipeline lifecycle integration tests.
//!
//! These tests drive the full crawl -> match -> publish flow with mock
//! collaborators and a real on-disk ledger:
//! - at most one post per run
//! - terminal ledger statuses short-circuit before any external call
//! - insufficient track supply records Tried and the run moves on
//! - transient image failures leave the release eligible for retry
//! - a degraded index stops the run

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use waxpost_core::{
    testing::{fixtures, MockAudioIndex, MockFeedClient, MockPageFetcher, MockReleaseFetcher},
    AudioIndex, CrawlPlan, Crawler, FeedClient, FeedError, FetchError, IndexError, LedgerStore,
    Outcome, PageFetcher, Pipeline, Publisher, ReleaseFetcher, RunOutcome, Section, SectionTier,
    SqliteLedger, TrackMatcher,
};

const PAGE_1: &str = "https://shop.example.com/new/?page=1";
const LINK_A: &str = "https://shop.example.com/11111-first/";
const LINK_B: &str = "https://shop.example.com/22222-second/";

/// Test helper wiring every pipeline collaborator.
struct TestHarness {
    ledger: Arc<SqliteLedger>,
    pages: Arc<MockPageFetcher>,
    releases: Arc<MockReleaseFetcher>,
    index: Arc<MockAudioIndex>,
    feed: Arc<MockFeedClient>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let ledger = Arc::new(
            SqliteLedger::new(&temp_dir.path().join("ledger.db"))
                .expect("Failed to create ledger"),
        );

        Self {
            ledger,
            pages: Arc::new(MockPageFetcher::new()),
            releases: Arc::new(MockReleaseFetcher::new()),
            index: Arc::new(MockAudioIndex::new()),
            feed: Arc::new(MockFeedClient::new()),
            _temp_dir: temp_dir,
        }
    }

    /// A single-section pipeline over two catalogue pages.
    fn pipeline(&self) -> Pipeline {
        let plan = CrawlPlan::ordered(
            vec![Section::new(
                "https://shop.example.com/new/?page={page}",
                SectionTier::Primary,
            )],
            vec![],
            2,
        );
        let crawler = Crawler::new(
            Arc::clone(&self.pages) as Arc<dyn PageFetcher>,
            plan,
        );
        let matcher = TrackMatcher::new(
            Arc::clone(&self.index) as Arc<dyn AudioIndex>,
            Duration::ZERO,
        );
        let publisher = Publisher::new(
            Arc::clone(&self.ledger) as Arc<dyn LedgerStore>,
            Arc::clone(&self.releases) as Arc<dyn ReleaseFetcher>,
            Arc::clone(&self.feed) as Arc<dyn FeedClient>,
            matcher,
        );
        Pipeline::new(crawler, publisher)
    }

    /// Configure a release with two tracks and one cover, both tracks known
    /// to the index.
    async fn add_publishable(&self, link: &str, artist: &str, owner_id: i64) {
        let tracks = vec![format!("{}: T1", artist), format!("{}: T2", artist)];
        self.releases
            .set_release(
                link,
                &format!("{}: Album", artist),
                "Label",
                tracks.clone(),
                vec![format!("{}cover_big.jpg", link)],
            )
            .await;
        for (i, track) in tracks.iter().enumerate() {
            self.index
                .set_results(
                    track,
                    vec![fixtures::index_entry(
                        artist,
                        &format!("T{}", i + 1),
                        owner_id,
                        i as i64 + 1,
                    )],
                )
                .await;
        }
    }

    /// Configure a release whose tracks the index does not know.
    async fn add_unmatchable(&self, link: &str, artist: &str) {
        self.releases
            .set_release(
                link,
                &format!("{}: Album", artist),
                "Label",
                vec![format!("{}: T1", artist), format!("{}: T2", artist)],
                vec![format!("{}cover_big.jpg", link)],
            )
            .await;
    }

    async fn set_listing(&self, links: &[&str]) {
        self.pages
            .set_page(
                PAGE_1,
                links
                    .iter()
                    .map(|l| fixtures::release_summary(l, "Artist", "Title"))
                    .collect(),
            )
            .await;
    }
}

#[tokio::test]
async fn test_end_to_end_publish() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A]).await;
    h.add_publishable(LINK_A, "Maurizio", 42).await;

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::Posted);

    let posts = h.feed.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].message,
        format!("Title: Maurizio: Album\nLabel: Label\nRelease link: {}", LINK_A)
    );
    // Two audio attachments plus the uploaded cover.
    assert_eq!(posts[0].attachments.len(), 3);
    assert!(posts[0].attachments[0].starts_with("audio42_"));
    assert!(posts[0].attachments[2].starts_with("photo"));

    assert_eq!(h.ledger.status(LINK_A).unwrap(), Outcome::Posted);
    assert_eq!(h.ledger.history(LINK_A).unwrap().len(), 1);
    assert_eq!(h.feed.upload_count().await, 1);
}

#[tokio::test]
async fn test_at_most_one_post_per_run() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A, LINK_B]).await;
    h.add_publishable(LINK_A, "Maurizio", 42).await;
    h.add_publishable(LINK_B, "Quadrant", 43).await;

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::Posted);
    assert_eq!(h.feed.posts().await.len(), 1);
    // The second release is untouched and still eligible.
    assert_eq!(h.ledger.status(LINK_A).unwrap(), Outcome::Posted);
    assert_eq!(h.ledger.status(LINK_B).unwrap(), Outcome::NotTried);
}

#[tokio::test]
async fn test_terminal_statuses_cost_no_external_calls() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A, LINK_B]).await;
    h.add_publishable(LINK_A, "Maurizio", 42).await;
    h.add_publishable(LINK_B, "Quadrant", 43).await;
    h.ledger.record(LINK_A, Outcome::Posted).unwrap();
    h.ledger.record(LINK_B, Outcome::Tried).unwrap();

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::NothingPosted);
    assert_eq!(h.releases.fetch_count().await, 0);
    assert_eq!(h.index.search_count().await, 0);
    assert!(h.feed.posts().await.is_empty());
}

#[tokio::test]
async fn test_insufficient_supply_records_tried_and_run_moves_on() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A, LINK_B]).await;
    h.add_unmatchable(LINK_A, "Obscure").await;
    h.add_publishable(LINK_B, "Quadrant", 43).await;

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::Posted);
    assert_eq!(h.ledger.status(LINK_A).unwrap(), Outcome::Tried);
    assert_eq!(h.ledger.status(LINK_B).unwrap(), Outcome::Posted);
    assert_eq!(h.feed.posts().await.len(), 1);
}

#[tokio::test]
async fn test_transient_upload_failure_leaves_release_eligible() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A, LINK_B]).await;
    h.add_publishable(LINK_A, "Maurizio", 42).await;
    h.add_publishable(LINK_B, "Quadrant", 43).await;
    h.feed
        .set_next_upload_error(FeedError::UploadFailed("staging down".to_string()))
        .await;

    let outcome = h.pipeline().run_once().await;

    // The first release fails locally and stays unrecorded; the second posts.
    assert_eq!(outcome, RunOutcome::Posted);
    assert_eq!(h.ledger.status(LINK_A).unwrap(), Outcome::NotTried);
    assert_eq!(h.ledger.status(LINK_B).unwrap(), Outcome::Posted);
}

#[tokio::test]
async fn test_degraded_index_stops_the_run() {
    let h = TestHarness::new();
    h.set_listing(&[LINK_A, LINK_B]).await;
    h.add_publishable(LINK_A, "Maurizio", 42).await;
    h.add_publishable(LINK_B, "Quadrant", 43).await;
    h.index
        .set_next_error(IndexError::ServiceDegraded("cooldown".to_string()))
        .await;

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::Stopped);
    assert!(h.feed.posts().await.is_empty());
    assert_eq!(h.ledger.status(LINK_A).unwrap(), Outcome::NotTried);
    assert_eq!(h.ledger.status(LINK_B).unwrap(), Outcome::NotTried);
}

#[tokio::test]
async fn test_empty_catalogue_finishes_with_nothing_posted() {
    let h = TestHarness::new();

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::NothingPosted);
    // One fetch of page 1 was enough to prune the only section.
    assert_eq!(h.pages.fetched_urls().await, vec![PAGE_1]);
}

#[tokio::test]
async fn test_crawl_error_stops_the_run() {
    let h = TestHarness::new();
    h.pages
        .set_next_error(FetchError::Http("shop unreachable".to_string()))
        .await;

    let outcome = h.pipeline().run_once().await;

    assert_eq!(outcome, RunOutcome::Stopped);
}
