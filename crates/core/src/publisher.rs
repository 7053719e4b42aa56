//! Per-release publish flow.
//!
//! Takes one release link from ledger check to feed post. The ledger is
//! written at exactly two points: `Tried` when track supply falls short, and
//! `Posted` after a successful feed post. Local, transient failures (image
//! handling, photo upload) write nothing so the release is retried on a
//! later run.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::catalog::FetchError;
use crate::feed::{Attachment, FeedClient, FeedError, MAX_ATTACHMENTS};
use crate::index::IndexError;
use crate::ledger::{LedgerError, LedgerStore, Outcome};
use crate::matcher::{MatchOutcome, TrackMatcher};
use crate::metrics;
use crate::shop::ReleaseFetcher;

/// Result of one publish attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A post went out and the ledger records `Posted`.
    Posted,
    /// Nothing was published. The ledger may or may not have been written;
    /// see the module docs.
    NotPosted,
}

/// Errors that abort the publish attempt and the surrounding run.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

/// Publishes a single release to the community feed.
pub struct Publisher {
    ledger: Arc<dyn LedgerStore>,
    fetcher: Arc<dyn ReleaseFetcher>,
    feed: Arc<dyn FeedClient>,
    matcher: TrackMatcher,
}

impl Publisher {
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        fetcher: Arc<dyn ReleaseFetcher>,
        feed: Arc<dyn FeedClient>,
        matcher: TrackMatcher,
    ) -> Self {
        Self {
            ledger,
            fetcher,
            feed,
            matcher,
        }
    }

    /// Attempt to publish the release behind `link`.
    ///
    /// Releases already `Posted` or `Tried` are skipped before any external
    /// call is made.
    pub async fn publish(&self, link: &str) -> Result<PublishOutcome, PublishError> {
        if self.ledger.status(link)?.is_terminal() {
            debug!("Skipping {}, already handled", link);
            return Ok(PublishOutcome::NotPosted);
        }

        let details = self.fetcher.details(link).await?;
        info!("Attempting to post {}", details.title);

        let tracks = self.fetcher.tracks(link).await?;
        if tracks.is_empty() {
            // Merchandise and other trackless listings. Not an attempt.
            debug!("No tracks at {}, skipping", link);
            return Ok(PublishOutcome::NotPosted);
        }

        let matches = match self.matcher.match_tracks(&tracks).await? {
            MatchOutcome::Resolved { matches, .. } => matches,
            MatchOutcome::Insufficient { resolved, total } => {
                info!(
                    "Not enough matched tracks for {} ({} of {})",
                    details.title, resolved, total
                );
                metrics::RELEASES_TRIED.inc();
                self.ledger.record(link, Outcome::Tried)?;
                return Ok(PublishOutcome::NotPosted);
            }
        };

        let photo = match self.first_cover_photo(link).await {
            Some(photo) => photo,
            None => return Ok(PublishOutcome::NotPosted),
        };

        let message = format!(
            "Title: {}\nLabel: {}\nRelease link: {}",
            details.title, details.label, link
        );

        let mut attachments: Vec<Attachment> = matches
            .iter()
            .map(|m| Attachment::Audio {
                owner_id: m.owner_id,
                audio_id: m.track_id,
            })
            .collect();
        if attachments.len() < MAX_ATTACHMENTS {
            attachments.push(Attachment::Photo {
                owner_id: photo.owner_id,
                photo_id: photo.photo_id,
            });
        }

        self.feed.post(&message, &attachments).await?;
        metrics::POSTS_PUBLISHED.inc();
        metrics::POST_ATTACHMENTS
            .with_label_values(&[])
            .observe(matches.len() as f64);

        // The post is out either way; a failed write here means the release
        // may be posted again on a later run, which is the lesser evil
        // compared to reporting a publish that never happened.
        if let Err(e) = self.ledger.record(link, Outcome::Posted) {
            error!("Posted {} but failed to record it: {}", link, e);
        }

        info!("Posted {}", details.title);
        Ok(PublishOutcome::Posted)
    }

    /// Upload the release's first cover image, or `None` when anything in
    /// the image path fails. Those failures are local and transient, so the
    /// release stays unrecorded and eligible for retry.
    async fn first_cover_photo(&self, link: &str) -> Option<crate::feed::PhotoRef> {
        let images = match self.fetcher.images(link).await {
            Ok(images) => images,
            Err(e) => {
                warn!("Failed to list cover images for {}: {}", link, e);
                return None;
            }
        };
        let first = match images.first() {
            Some(first) => first,
            None => {
                warn!("No cover images at {}", link);
                return None;
            }
        };
        let bytes = match self.fetcher.image_bytes(first).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to download cover {}: {}", first, e);
                return None;
            }
        };
        match self.feed.upload_photo(bytes).await {
            Ok(photo) => Some(photo),
            Err(e) => {
                warn!("Failed to upload cover for {}: {}", link, e);
                None
            }
        }
    }
}
