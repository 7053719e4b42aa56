//! Prioritized lazy crawl over catalogue sections.
//!
//! Emission order: for page = 1..=max_page, every non-exhausted primary
//! section; then the same page sweep over the secondary tier. A section
//! whose page comes back empty is marked exhausted for the remainder of the
//! run and its pages are never emitted again. Exhaustion is not persisted:
//! sections grow between runs.

use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::metrics;

use super::types::{FetchError, PageFetcher, ReleaseSummary, Section, SectionTier};

/// Run-local crawl state: section order, page cursor and the exhausted set.
///
/// Owned by the [`Crawler`]; nothing here outlives the run.
#[derive(Debug)]
pub struct CrawlPlan {
    sections: Vec<Section>,
    max_page: u32,
    exhausted: HashSet<String>,
    cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy)]
struct Cursor {
    tier: SectionTier,
    page: u32,
    idx: usize,
}

impl CrawlPlan {
    /// Build a plan with the given section order preserved.
    pub fn ordered(primary: Vec<Section>, secondary: Vec<Section>, max_page: u32) -> Self {
        let mut sections = primary;
        sections.extend(secondary);
        Self {
            sections,
            max_page,
            exhausted: HashSet::new(),
            cursor: Some(Cursor {
                tier: SectionTier::Primary,
                page: 1,
                idx: 0,
            }),
        }
    }

    /// Build a plan from section templates, shuffling the secondary tier
    /// once so later sections are not deterministically starved.
    pub fn shuffled(primary: &[String], secondary: &[String], max_page: u32) -> Self {
        let primary = primary
            .iter()
            .map(|t| Section::new(t.clone(), SectionTier::Primary))
            .collect();
        let mut secondary: Vec<Section> = secondary
            .iter()
            .map(|t| Section::new(t.clone(), SectionTier::Secondary))
            .collect();
        secondary.shuffle(&mut rand::rng());
        Self::ordered(primary, secondary, max_page)
    }

    /// Mark a section exhausted for the remainder of the run.
    pub fn mark_exhausted(&mut self, section: &Section) {
        self.exhausted.insert(section.base().to_string());
    }

    /// Whether a section is currently excluded from emission.
    pub fn is_exhausted(&self, section: &Section) -> bool {
        self.exhausted.contains(section.base())
    }

    fn tier_has_live_sections(&self, tier: SectionTier) -> bool {
        self.sections
            .iter()
            .any(|s| s.tier == tier && !self.is_exhausted(s))
    }

    /// Advance to the next (section, page) pair to fetch.
    ///
    /// Returns `None` once both tiers have been swept up to `max_page` or
    /// fully exhausted.
    pub fn next_slot(&mut self) -> Option<(Section, u32)> {
        loop {
            let cursor = self.cursor?;

            // Fast-forward past a fully exhausted tier instead of sweeping
            // max_page empty passes over it.
            if !self.tier_has_live_sections(cursor.tier) {
                self.cursor = Self::next_tier(cursor.tier, self.max_page);
                continue;
            }

            match self.sections.get(cursor.idx) {
                Some(section) if section.tier == cursor.tier => {
                    self.cursor = Some(Cursor {
                        idx: cursor.idx + 1,
                        ..cursor
                    });
                    if !self.is_exhausted(section) {
                        return Some((section.clone(), cursor.page));
                    }
                }
                Some(_) | None => {
                    // End of this tier's section list: next page, or next tier.
                    if cursor.page < self.max_page {
                        self.cursor = Some(Cursor {
                            tier: cursor.tier,
                            page: cursor.page + 1,
                            idx: 0,
                        });
                    } else {
                        self.cursor = Self::next_tier(cursor.tier, self.max_page);
                    }
                }
            }

            // Secondary sections follow primary ones in `sections`, so the
            // idx scan must start where the tier starts.
            if let Some(c) = self.cursor {
                if c.idx == 0 && c.tier == SectionTier::Secondary {
                    let start = self
                        .sections
                        .iter()
                        .position(|s| s.tier == SectionTier::Secondary)
                        .unwrap_or(self.sections.len());
                    self.cursor = Some(Cursor { idx: start, ..c });
                }
            }
        }
    }

    fn next_tier(current: SectionTier, _max_page: u32) -> Option<Cursor> {
        match current {
            SectionTier::Primary => Some(Cursor {
                tier: SectionTier::Secondary,
                page: 1,
                idx: 0,
            }),
            SectionTier::Secondary => None,
        }
    }
}

/// One non-empty catalogue page worth of releases.
#[derive(Debug, Clone)]
pub struct CrawlBatch {
    /// Base URL of the section the page came from.
    pub section: String,
    /// Page number within the section.
    pub page: u32,
    /// Releases in page order.
    pub releases: Vec<ReleaseSummary>,
}

/// Lazy catalogue crawler.
pub struct Crawler {
    fetcher: Arc<dyn PageFetcher>,
    plan: CrawlPlan,
}

impl Crawler {
    pub fn new(fetcher: Arc<dyn PageFetcher>, plan: CrawlPlan) -> Self {
        Self { fetcher, plan }
    }

    /// Fetch pages until one yields releases, pruning sections whose pages
    /// come back empty.
    ///
    /// Returns `Ok(None)` when the crawl space is spent.
    pub async fn next_batch(&mut self) -> Result<Option<CrawlBatch>, FetchError> {
        while let Some((section, page)) = self.plan.next_slot() {
            let url = section.page_url(page);
            debug!("Fetching catalogue page {}", url);

            let releases = self.fetcher.fetch_page(&url).await?;
            metrics::PAGES_FETCHED.inc();

            if releases.is_empty() {
                info!("Section exhausted at page {}: {}", page, section.base());
                metrics::SECTIONS_EXHAUSTED.inc();
                self.plan.mark_exhausted(&section);
                continue;
            }

            debug!(
                "Page {} of {} listed {} releases",
                page,
                section.base(),
                releases.len()
            );
            return Ok(Some(CrawlBatch {
                section: section.base().to_string(),
                page,
                releases,
            }));
        }

        Ok(None)
    }
}
