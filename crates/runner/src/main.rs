use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waxpost_core::{
    load_config, refresh_pinned_post, validate_config, AudioIndex, CrawlPlan, Crawler, FeedClient,
    HttpAudioIndex, HttpFeedClient, LedgerStore, PageFetcher, Pipeline, Publisher, ReleaseFetcher,
    RunOutcome, ShopClient, SqliteLedger, TrackMatcher,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("waxpost {} starting", VERSION);

    // Determine config path
    let config_path = std::env::var("WAXPOST_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Database path: {:?}", config.database.path);
    info!(
        "Catalogue sections: {} primary, {} secondary",
        config.catalog.primary_sections.len(),
        config.catalog.secondary_sections.len()
    );

    // Config hash for correlating runs in logs
    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!("Config hash: {}", &config_hash[..16]);

    // Create the dedup ledger
    let ledger: Arc<dyn LedgerStore> = Arc::new(
        SqliteLedger::new(&config.database.path).context("Failed to open ledger database")?,
    );
    info!("Ledger initialized");

    // Create the shop client, serving both the crawler and the publisher
    let shop = Arc::new(ShopClient::new(&config.catalog).context("Failed to create shop client")?);

    // Create the audio index client
    let index: Arc<dyn AudioIndex> = Arc::new(
        HttpAudioIndex::new(config.index.clone()).context("Failed to create index client")?,
    );
    info!("Audio index: {}", index.name());

    // Create the feed client
    let feed: Arc<dyn FeedClient> = Arc::new(
        HttpFeedClient::new(config.feed.clone()).context("Failed to create feed client")?,
    );

    // Refresh the pinned post first; a failure here only costs the refresh
    if config.pinboard.enabled {
        if let Err(e) = refresh_pinned_post(feed.as_ref(), config.pinboard.scan_depth).await {
            warn!("Pinned post refresh failed: {}", e);
        }
    }

    // Wire the pipeline
    let plan = CrawlPlan::shuffled(
        &config.catalog.primary_sections,
        &config.catalog.secondary_sections,
        config.catalog.max_page,
    );
    let crawler = Crawler::new(Arc::clone(&shop) as Arc<dyn PageFetcher>, plan);
    let matcher = TrackMatcher::new(
        index,
        Duration::from_secs(config.index.search_delay_secs),
    );
    let publisher = Publisher::new(
        ledger,
        Arc::clone(&shop) as Arc<dyn ReleaseFetcher>,
        feed,
        matcher,
    );

    // One run per invocation; scheduling lives outside the process
    let outcome = Pipeline::new(crawler, publisher).run_once().await;
    info!("Run finished: {}", outcome.as_str());

    if outcome == RunOutcome::Stopped {
        anyhow::bail!("run stopped by a collaborator failure");
    }
    Ok(())
}
