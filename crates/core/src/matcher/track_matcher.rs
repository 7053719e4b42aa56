//! Release-level track matching.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::index::{AudioIndex, IndexError};
use crate::metrics;

use super::distance::{levenshtein, normalize};

/// At most this many tracks are ever attached to a post, so matching past
/// this point is wasted index quota.
pub const MAX_TRACK_MATCHES: usize = 9;

/// A source track resolved to a hosted audio entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMatch {
    /// The track string as listed by the shop.
    pub source_track: String,
    pub owner_id: i64,
    pub track_id: i64,
}

/// Result of matching a full tracklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The matcher ran the tracklist to completion (or hit the attachment
    /// cap). `matches` preserves tracklist order.
    Resolved {
        matches: Vec<TrackMatch>,
        unresolved: usize,
    },
    /// Matching was cut short because the remaining tracks could no longer
    /// reach an acceptable total.
    Insufficient { resolved: usize, total: usize },
}

enum Resolution {
    Matched { owner_id: i64, track_id: i64 },
    Unresolved,
    Skipped,
}

/// Matches a release's tracklist against an [`AudioIndex`], with a fixed
/// cooldown between searches.
pub struct TrackMatcher {
    index: Arc<dyn AudioIndex>,
    search_delay: Duration,
}

impl TrackMatcher {
    pub fn new(index: Arc<dyn AudioIndex>, search_delay: Duration) -> Self {
        Self {
            index,
            search_delay,
        }
    }

    /// Match every track of a release, in listing order.
    ///
    /// Stops early with [`MatchOutcome::Insufficient`] once the tracks still
    /// unprocessed cannot lift the match count to either the full tracklist
    /// or [`MAX_TRACK_MATCHES`]. A track resolving to an already-claimed
    /// `(owner_id, track_id)` pair counts as unresolved, not as a second
    /// match.
    ///
    /// Any [`IndexError`] aborts matching; the index is either down or
    /// cooling us off, and neither improves by continuing.
    pub async fn match_tracks(&self, tracks: &[String]) -> Result<MatchOutcome, IndexError> {
        let total = tracks.len();
        let mut matches: Vec<TrackMatch> = Vec::new();
        let mut claimed: HashSet<(i64, i64)> = HashSet::new();
        let mut unresolved = 0usize;

        for (i, track) in tracks.iter().enumerate() {
            match self.resolve_track(track).await? {
                Resolution::Matched { owner_id, track_id } => {
                    if claimed.insert((owner_id, track_id)) {
                        matches.push(TrackMatch {
                            source_track: track.clone(),
                            owner_id,
                            track_id,
                        });
                    } else {
                        debug!("{:?} resolved to an already-claimed entry", track);
                        unresolved += 1;
                    }
                }
                Resolution::Unresolved | Resolution::Skipped => unresolved += 1,
            }

            if matches.len() >= MAX_TRACK_MATCHES {
                debug!("Attachment cap reached after {} of {} tracks", i + 1, total);
                break;
            }

            let remaining = total - i - 1;
            let max_possible = remaining + matches.len();
            if max_possible < total && max_possible < MAX_TRACK_MATCHES {
                info!(
                    "Pruning after {} of {} tracks, at most {} matches still possible",
                    i + 1,
                    total,
                    max_possible
                );
                return Ok(MatchOutcome::Insufficient {
                    resolved: matches.len(),
                    total,
                });
            }
        }

        Ok(MatchOutcome::Resolved {
            matches,
            unresolved,
        })
    }

    async fn resolve_track(&self, track: &str) -> Result<Resolution, IndexError> {
        if let Some((artist, title)) = track.split_once(": ") {
            // Catalogue filler entries that match everything and mean nothing.
            if title.eq_ignore_ascii_case("version") || artist.eq_ignore_ascii_case("unknown") {
                debug!("Skipping ambiguous track {:?}", track);
                return Ok(Resolution::Skipped);
            }
        }

        debug!("Searching index for {:?}", track);
        let candidates = self.index.search(track).await?;
        metrics::INDEX_SEARCHES.inc();

        // Fixed cooldown after every search, matched or not. The index
        // throttles on request rate alone.
        tokio::time::sleep(self.search_delay).await;

        let needle = normalize(track);
        let mut min_distance: Option<usize> = None;

        for candidate in &candidates {
            let d = levenshtein(&needle, &normalize(&candidate.display()));
            if d == 0 {
                debug!("{:?} matched {:?}", track, candidate.display());
                metrics::TRACKS_MATCHED.inc();
                return Ok(Resolution::Matched {
                    owner_id: candidate.owner_id,
                    track_id: candidate.track_id,
                });
            }
            min_distance = Some(min_distance.map_or(d, |m| m.min(d)));
        }

        match min_distance {
            Some(d) => debug!(
                "{:?} unresolved, closest of {} candidates at distance {}",
                track,
                candidates.len(),
                d
            ),
            None => debug!("{:?} unresolved, index returned no candidates", track),
        }

        Ok(Resolution::Unresolved)
    }
}
