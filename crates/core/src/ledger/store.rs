//! Ledger storage trait and types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Publish outcome for a release link.
///
/// `Tried` and `Posted` are terminal: a release in either state must never
/// be reprocessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NotTried,
    Tried,
    Posted,
}

impl Outcome {
    /// Whether this outcome permanently excludes the release from future runs.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Tried | Outcome::Posted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::NotTried => "not_tried",
            Outcome::Tried => "tried",
            Outcome::Posted => "posted",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded ledger row.
#[derive(Debug, Clone)]
pub struct LedgerEntry {
    /// Release link the outcome belongs to.
    pub link: String,
    /// Recorded outcome.
    pub outcome: Outcome,
    /// When the row was written.
    pub recorded_at: DateTime<Utc>,
}

/// Error type for ledger operations.
///
/// Store unavailability is the only failure mode here and it is transient:
/// callers must skip the current release for this run rather than write a
/// wrong terminal outcome.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Ledger store unavailable: {0}")]
    Unavailable(String),
}

/// Trait for ledger storage backends.
pub trait LedgerStore: Send + Sync {
    /// Last known outcome for a release link.
    ///
    /// A link with no prior row is `NotTried`.
    fn status(&self, link: &str) -> Result<Outcome, LedgerError>;

    /// Append a new outcome row for a release link.
    fn record(&self, link: &str, outcome: Outcome) -> Result<(), LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_outcomes() {
        assert!(!Outcome::NotTried.is_terminal());
        assert!(Outcome::Tried.is_terminal());
        assert!(Outcome::Posted.is_terminal());
    }

    #[test]
    fn test_outcome_roundtrip() {
        for outcome in [Outcome::NotTried, Outcome::Tried, Outcome::Posted] {
            let json = serde_json::to_string(&outcome).unwrap();
            let parsed: Outcome = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, outcome);
        }
        assert_eq!(serde_json::to_string(&Outcome::Posted).unwrap(), "\"posted\"");
    }
}
