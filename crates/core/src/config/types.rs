use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub index: IndexConfig,
    pub feed: FeedConfig,
    #[serde(default)]
    pub pinboard: PinboardConfig,
}

/// Database configuration (the dedup ledger lives here).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("waxpost.db")
}

/// Catalogue crawl configuration.
///
/// Section entries are page-URL templates containing a `{page}` placeholder,
/// e.g. `https://shop.example.com/this-week/?page={page}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Shop site root, used to resolve relative release links.
    pub base_url: String,
    /// Sections always scanned first, in the given order.
    pub primary_sections: Vec<String>,
    /// Sections scanned after the primary tier, shuffled once per run.
    #[serde(default)]
    pub secondary_sections: Vec<String>,
    /// Hard upper bound on pages per section; a crawl-termination safety
    /// valve, not an expected limit.
    #[serde(default = "default_max_page")]
    pub max_page: u32,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_max_page() -> u32 {
    1000
}

/// External audio index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexConfig {
    /// Index API base URL.
    pub base_url: String,
    /// API access token.
    pub access_token: String,
    /// Mandatory delay after each search call, in seconds. The service
    /// cools down clients that query faster than this.
    #[serde(default = "default_search_delay")]
    pub search_delay_secs: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_search_delay() -> u64 {
    7
}

/// Community feed (publish target) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedConfig {
    /// Feed API base URL.
    pub base_url: String,
    /// API access token.
    pub access_token: String,
    /// Community identifier posts are published under (negative for groups).
    pub owner_id: i64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

/// Pinned-post maintenance configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PinboardConfig {
    /// Whether to refresh the pinned post before each run.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How many recent posts to scan for the most-liked one.
    #[serde(default = "default_scan_depth")]
    pub scan_depth: u32,
}

impl Default for PinboardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scan_depth: default_scan_depth(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_scan_depth() -> u32 {
    35
}

fn default_timeout() -> u32 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[catalog]
base_url = "https://shop.example.com"
primary_sections = ["https://shop.example.com/?page={page}"]

[index]
base_url = "https://index.example.com"
access_token = "secret"

[feed]
base_url = "https://feed.example.com"
access_token = "secret"
owner_id = -1234
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.primary_sections.len(), 1);
        assert!(config.catalog.secondary_sections.is_empty());
        assert_eq!(config.catalog.max_page, 1000);
        assert_eq!(config.index.search_delay_secs, 7);
        assert_eq!(config.feed.owner_id, -1234);
        assert!(config.pinboard.enabled);
        assert_eq!(config.pinboard.scan_depth, 35);
        assert_eq!(config.database.path, PathBuf::from("waxpost.db"));
    }

    #[test]
    fn test_deserialize_overrides() {
        let toml = r#"
[database]
path = "/var/lib/waxpost/ledger.db"

[catalog]
base_url = "https://shop.example.com"
primary_sections = ["https://shop.example.com/?page={page}"]
secondary_sections = ["https://shop.example.com/techno/?page={page}"]
max_page = 50

[index]
base_url = "https://index.example.com"
access_token = "secret"
search_delay_secs = 1

[feed]
base_url = "https://feed.example.com"
access_token = "secret"
owner_id = -1234

[pinboard]
enabled = false
scan_depth = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.max_page, 50);
        assert_eq!(config.index.search_delay_secs, 1);
        assert!(!config.pinboard.enabled);
        assert_eq!(config.pinboard.scan_depth, 10);
        assert_eq!(
            config.database.path,
            PathBuf::from("/var/lib/waxpost/ledger.db")
        );
    }

    #[test]
    fn test_missing_feed_section_fails() {
        let toml = r#"
[catalog]
base_url = "https://shop.example.com"
primary_sections = ["https://shop.example.com/?page={page}"]

[index]
base_url = "https://index.example.com"
access_token = "secret"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }
}
