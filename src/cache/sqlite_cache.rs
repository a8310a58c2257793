//! Persistent cache stored in a SQLite database file.

use super::service::{CacheError, CacheResult, ExpansionCache};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// SQL schema for the cache database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS expansions (
    short_url TEXT PRIMARY KEY,
    expanded_url TEXT NOT NULL,
    cached_at TEXT NOT NULL
);
"#;

/// SQLite-backed expansion cache.
///
/// Survives across runs, so a batch re-run with the same file only touches
/// the network for URLs that were never expanded before.
pub struct SqliteCache {
    conn: Mutex<Connection>,
}

impl SqliteCache {
    /// Opens (or creates) the cache database at `path`
    pub fn open(path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        info!("Opened SQLite cache at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> CacheResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Operation("SQLite connection lock poisoned".to_string()))
    }

    /// Number of cached expansions
    pub fn count(&self) -> CacheResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM expansions", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ExpansionCache for SqliteCache {
    async fn get(&self, url: &str) -> CacheResult<Option<String>> {
        let conn = self.lock()?;
        let expanded = conn
            .query_row(
                "SELECT expanded_url FROM expansions WHERE short_url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(expanded)
    }

    async fn set(&self, url: &str, expanded: &str) -> CacheResult<bool> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO expansions (short_url, expanded_url, cached_at) VALUES (?1, ?2, ?3)",
            params![url, expanded, Utc::now().to_rfc3339()],
        )?;
        Ok(true)
    }

    fn name(&self) -> &'static str {
        "sqlite"
    }
}
