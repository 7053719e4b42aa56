//! Mock audio index for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::index::{AudioIndex, IndexEntry, IndexError};

/// Mock implementation of the [`AudioIndex`] trait.
///
/// Results are configured per query; unknown queries search as empty.
/// Queries are recorded for assertions about search volume, which the
/// matcher's pruning and cap logic exists to bound.
pub struct MockAudioIndex {
    /// Configured results by exact query string.
    results: Arc<RwLock<HashMap<String, Vec<IndexEntry>>>>,
    /// Recorded queries, in order.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next search fails with this error.
    next_error: Arc<RwLock<Option<IndexError>>>,
}

impl Default for MockAudioIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAudioIndex {
    /// Create a mock index that knows no tracks.
    pub fn new() -> Self {
        Self {
            results: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Set the entries a query resolves to.
    pub async fn set_results(&self, query: &str, entries: Vec<IndexEntry>) {
        self.results.write().await.insert(query.to_string(), entries);
    }

    /// Queries searched so far, in order.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: IndexError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl AudioIndex for MockAudioIndex {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, query: &str) -> Result<Vec<IndexEntry>, IndexError> {
        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        self.queries.write().await.push(query.to_string());

        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_unknown_query_searches_empty() {
        let index = MockAudioIndex::new();
        assert!(index.search("nothing").await.unwrap().is_empty());
        assert_eq!(index.search_count().await, 1);
    }

    #[tokio::test]
    async fn test_configured_results_are_returned() {
        let index = MockAudioIndex::new();
        index
            .set_results("A: T", vec![fixtures::index_entry("A", "T", 1, 2)])
            .await;

        let entries = index.search("A: T").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(index.recorded_queries().await, vec!["A: T"]);
    }

    #[tokio::test]
    async fn test_error_is_consumed() {
        let index = MockAudioIndex::new();
        index
            .set_next_error(IndexError::ServiceDegraded("cooldown".to_string()))
            .await;

        assert!(index.search("x").await.is_err());
        assert!(index.search("x").await.is_ok());
    }
}
