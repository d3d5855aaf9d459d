//! Database schema and connection management

use crate::error::{classify_db_error, Result, StatsError};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Store handle for statistical records.
///
/// Opened explicitly for one run and passed to whatever needs it; there is no
/// process-wide connection.
pub struct StatStore {
    pub(crate) conn: Connection,
}

impl StatStore {
    /// Open (or create) the store at `path`. `timeout` bounds how long any
    /// statement waits on a locked database before failing as transient.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path).map_err(classify_db_error)?;
        conn.busy_timeout(timeout).map_err(classify_db_error)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        info!("Opened stat store at {}", path.display());
        Ok(store)
    }

    /// In-memory store, used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Default on-disk location under the user cache directory.
    pub fn default_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir().ok_or_else(|| {
            StatsError::configuration("Could not determine cache directory")
        })?;
        Ok(cache_dir.join("epl-analytics").join("epl.db"))
    }

    /// Close the connection, surfacing any error SQLite reports on close.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| classify_db_error(e))?;
        debug!("Closed stat store");
        Ok(())
    }

    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS stat_records (
                kind TEXT NOT NULL,
                season TEXT NOT NULL,
                record_key TEXT NOT NULL,
                record_id TEXT NOT NULL,
                name TEXT NOT NULL DEFAULT '',
                team TEXT NOT NULL DEFAULT '',
                position TEXT NOT NULL DEFAULT '',
                revision INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (kind, season, record_key)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS record_stats (
                kind TEXT NOT NULL,
                season TEXT NOT NULL,
                record_key TEXT NOT NULL,
                stat TEXT NOT NULL,
                value REAL NOT NULL,
                PRIMARY KEY (kind, season, record_key, stat),
                FOREIGN KEY (kind, season, record_key)
                    REFERENCES stat_records(kind, season, record_key) ON DELETE CASCADE
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_records_season
             ON stat_records(kind, season)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_stats_ranking
             ON record_stats(kind, season, stat, value)",
            [],
        )?;

        self.conn.execute("PRAGMA foreign_keys = ON", [])?;

        Ok(())
    }
}
