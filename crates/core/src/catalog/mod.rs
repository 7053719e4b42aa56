//! Catalogue discovery.
//!
//! Produces an ordered, lazily fetched stream of release links from a
//! prioritized set of paginated shop sections, pruning sections whose
//! pagination has run past their last real page.

mod crawler;
mod types;

pub use crawler::{CrawlBatch, CrawlPlan, Crawler};
pub use types::{FetchError, PageFetcher, ReleaseSummary, Section, SectionTier};
