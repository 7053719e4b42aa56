//! Fuzzy track matching against the external audio index.
//!
//! A source track is accepted only when its normalized form is an exact
//! (distance 0) Levenshtein match for a candidate; anything looser attaches
//! the wrong recording often enough to be worse than attaching nothing.

mod distance;
mod track_matcher;

pub use distance::{levenshtein, normalize};
pub use track_matcher::{MatchOutcome, TrackMatch, TrackMatcher, MAX_TRACK_MATCHES};
