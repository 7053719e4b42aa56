pub mod catalog;
pub mod config;
pub mod feed;
pub mod index;
pub mod ledger;
pub mod matcher;
pub mod metrics;
pub mod pipeline;
pub mod publisher;
pub mod shop;
pub mod testing;

pub use catalog::{
    CrawlBatch, CrawlPlan, Crawler, FetchError, PageFetcher, ReleaseSummary, Section, SectionTier,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    DatabaseConfig, FeedConfig, IndexConfig, PinboardConfig,
};
pub use feed::{
    refresh_pinned_post, Attachment, FeedClient, FeedError, FeedPost, HttpFeedClient, PhotoRef,
};
pub use index::{AudioIndex, HttpAudioIndex, IndexEntry, IndexError};
pub use ledger::{LedgerEntry, LedgerError, LedgerStore, Outcome, SqliteLedger};
pub use matcher::{MatchOutcome, TrackMatch, TrackMatcher};
pub use pipeline::{Pipeline, RunOutcome};
pub use publisher::{PublishError, PublishOutcome, Publisher};
pub use shop::{ReleaseDetails, ReleaseFetcher, ShopClient};
