//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Crawl (pages fetched, sections exhausted)
//! - Matching (index searches, track matches)
//! - Publishing (posts, tried releases, runs by outcome)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Crawl
// =============================================================================

/// Catalogue listing pages fetched.
pub static PAGES_FETCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_pages_fetched_total",
        "Total catalogue pages fetched",
    )
    .unwrap()
});

/// Sections pruned from the crawl after an empty page.
pub static SECTIONS_EXHAUSTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_sections_exhausted_total",
        "Total sections marked exhausted",
    )
    .unwrap()
});

// =============================================================================
// Matching
// =============================================================================

/// Queries sent to the audio index.
pub static INDEX_SEARCHES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_index_searches_total",
        "Total audio index searches",
    )
    .unwrap()
});

/// Tracks resolved to an exact index entry.
pub static TRACKS_MATCHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_tracks_matched_total",
        "Total tracks matched exactly in the index",
    )
    .unwrap()
});

// =============================================================================
// Publishing
// =============================================================================

/// Posts published to the community feed.
pub static POSTS_PUBLISHED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_posts_published_total",
        "Total posts published to the feed",
    )
    .unwrap()
});

/// Releases recorded as tried after insufficient track supply.
pub static RELEASES_TRIED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "waxpost_releases_tried_total",
        "Total releases given up on for lack of matched tracks",
    )
    .unwrap()
});

/// Pipeline runs by terminal outcome.
pub static RUNS_COMPLETED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("waxpost_runs_completed_total", "Total pipeline runs"),
        &["outcome"], // "posted", "nothing_posted", "stopped"
    )
    .unwrap()
});

/// Audio attachments per published post.
pub static POST_ATTACHMENTS: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "waxpost_post_attachments",
            "Number of audio attachments per published post",
        )
        .buckets(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]),
        &[],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Crawl
        Box::new(PAGES_FETCHED.clone()),
        Box::new(SECTIONS_EXHAUSTED.clone()),
        // Matching
        Box::new(INDEX_SEARCHES.clone()),
        Box::new(TRACKS_MATCHED.clone()),
        // Publishing
        Box::new(POSTS_PUBLISHED.clone()),
        Box::new(RELEASES_TRIED.clone()),
        Box::new(RUNS_COMPLETED.clone()),
        Box::new(POST_ATTACHMENTS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_register_cleanly() {
        let registry = prometheus::Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
    }
}
