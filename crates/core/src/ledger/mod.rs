//! Durable dedup ledger.
//!
//! Maps a release link to the last known publish outcome so a release is
//! never posted (or pointlessly retried) twice. The store is append-only:
//! `record` always inserts a new row and readers use the most recent one.

mod sqlite;
mod store;

pub use sqlite::SqliteLedger;
pub use store::{LedgerEntry, LedgerError, LedgerStore, Outcome};
