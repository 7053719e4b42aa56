//! Run orchestration: crawl, skip, publish, stop.
//!
//! A run walks the catalogue in crawl order and hands each release to the
//! publisher until one post goes out, the crawl space is spent, or a
//! collaborator fails in a way that retrying within the run cannot fix.
//! Strictly sequential; the index cooldown dominates the run time anyway.

use tracing::{error, info};

use crate::catalog::Crawler;
use crate::metrics;
use crate::publisher::{PublishOutcome, Publisher};

/// Terminal status of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Exactly one post was published.
    Posted,
    /// The whole crawl space was scanned without publishing anything.
    NothingPosted,
    /// The run was aborted by a collaborator failure.
    Stopped,
}

impl RunOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunOutcome::Posted => "posted",
            RunOutcome::NothingPosted => "nothing_posted",
            RunOutcome::Stopped => "stopped",
        }
    }
}

/// Drives one publish-at-most-one run over the catalogue.
pub struct Pipeline {
    crawler: Crawler,
    publisher: Publisher,
}

impl Pipeline {
    pub fn new(crawler: Crawler, publisher: Publisher) -> Self {
        Self { crawler, publisher }
    }

    /// Run until a post goes out or the run reaches a terminal state.
    pub async fn run_once(mut self) -> RunOutcome {
        loop {
            let batch = match self.crawler.next_batch().await {
                Ok(Some(batch)) => batch,
                Ok(None) => {
                    info!("Catalogue scanned end to end, nothing publishable");
                    return finish(RunOutcome::NothingPosted);
                }
                Err(e) => {
                    error!("Crawl failed: {}", e);
                    return finish(RunOutcome::Stopped);
                }
            };

            info!(
                "Scanning {} releases from {} page {}",
                batch.releases.len(),
                batch.section,
                batch.page
            );

            for release in &batch.releases {
                match self.publisher.publish(&release.link).await {
                    Ok(PublishOutcome::Posted) => return finish(RunOutcome::Posted),
                    Ok(PublishOutcome::NotPosted) => continue,
                    Err(e) => {
                        error!("Run aborted at {}: {}", release.link, e);
                        return finish(RunOutcome::Stopped);
                    }
                }
            }
        }
    }
}

fn finish(outcome: RunOutcome) -> RunOutcome {
    metrics::RUNS_COMPLETED
        .with_label_values(&[outcome.as_str()])
        .inc();
    outcome
}
