//! SQLite-backed ledger implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{LedgerEntry, LedgerError, LedgerStore, Outcome};

/// SQLite-backed dedup ledger.
///
/// Rows are never updated or deleted; `status` reads the most recent row
/// for a link.
pub struct SqliteLedger {
    conn: Mutex<Connection>,
}

impl SqliteLedger {
    /// Open (and initialize if needed) a ledger at the given path.
    pub fn new(path: &Path) -> Result<Self, LedgerError> {
        let conn = Connection::open(path).map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory ledger (useful for testing).
    pub fn in_memory() -> Result<Self, LedgerError> {
        let conn =
            Connection::open_in_memory().map_err(|e| LedgerError::Unavailable(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), LedgerError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS ledger (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                link TEXT NOT NULL,
                outcome TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ledger_link ON ledger(link);
            "#,
        )
        .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        Ok(())
    }

    /// All recorded rows for a link, oldest first. Diagnostic view; the
    /// pipeline only ever reads the most recent outcome.
    pub fn history(&self, link: &str) -> Result<Vec<LedgerEntry>, LedgerError> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn
            .prepare("SELECT link, outcome, recorded_at FROM ledger WHERE link = ? ORDER BY id")
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let rows = stmt
            .query_map(params![link], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let mut entries = Vec::new();
        for row in rows {
            let (link, outcome, recorded_at) =
                row.map_err(|e| LedgerError::Unavailable(e.to_string()))?;
            entries.push(LedgerEntry {
                link,
                outcome: Self::parse_outcome(&outcome),
                recorded_at: DateTime::parse_from_rfc3339(&recorded_at)
                    .map_err(|e| LedgerError::Unavailable(e.to_string()))?
                    .with_timezone(&Utc),
            });
        }
        Ok(entries)
    }

    fn parse_outcome(raw: &str) -> Outcome {
        match raw {
            "tried" => Outcome::Tried,
            "posted" => Outcome::Posted,
            _ => Outcome::NotTried,
        }
    }
}

impl LedgerStore for SqliteLedger {
    fn status(&self, link: &str) -> Result<Outcome, LedgerError> {
        let conn = self.conn.lock().unwrap();

        let row: Option<String> = conn
            .query_row(
                "SELECT outcome FROM ledger WHERE link = ? ORDER BY id DESC LIMIT 1",
                params![link],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        Ok(row
            .map(|raw| Self::parse_outcome(&raw))
            .unwrap_or(Outcome::NotTried))
    }

    fn record(&self, link: &str, outcome: Outcome) -> Result<(), LedgerError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO ledger (link, outcome, recorded_at) VALUES (?, ?, ?)",
            params![link, outcome.as_str(), Utc::now().to_rfc3339()],
        )
        .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        Ok(())
    }
}
