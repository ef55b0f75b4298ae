// Quarry's Database Module
//
// Persistent storage of files, symbols, keywords, and relations using SQLite.
// The store is a single-writer resource; all mutating call chains go through
// the TransactionCoordinator in `coordinator.rs`.

pub mod coordinator;
mod files;
mod keywords;
mod relations;
mod schema;
mod symbols;
pub mod types;

pub use coordinator::TransactionCoordinator;
pub use types::{
    DetectedRelation, FileRecord, KeywordPosting, NewSymbol, RelationType, RunResult, StoreStats,
    SymbolRecord, SymbolType,
};

use crate::error::{IndexError, Result};
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Current schema version, written to `workspace_meta` and implied by the
/// presence of the sibling version marker file.
pub const SCHEMA_VERSION: &str = "1";

/// Symbol store backed by SQLite
pub struct SymbolStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SymbolStore {
    /// Open (or create) the store at `db_path`.
    ///
    /// Creates the parent directory, applies the PRAGMA profile (foreign keys
    /// on, WAL journaling), runs schema creation idempotently, and writes the
    /// version marker. A database without its marker is stale and gets
    /// deleted; so does one that fails the integrity probe.
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent).map_err(|source| IndexError::IoFailure {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let marker = Self::version_marker_path(db_path);
        if db_path.exists() && !marker.exists() {
            warn!(
                "Version marker missing next to {}; deleting stale database",
                db_path.display()
            );
            Self::remove_database_files(db_path);
        }

        if db_path.exists() && !Self::probe_integrity(db_path) {
            warn!(
                "Integrity check failed for {}; deleting and recreating",
                db_path.display()
            );
            Self::remove_database_files(db_path);
        }

        let conn = Connection::open(db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        // WAL must be active before any schema work so all writes share one
        // journaling mode.
        let journal: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        if !journal.eq_ignore_ascii_case("wal") {
            debug!("journal_mode fell back to '{}'", journal);
        }

        let mut store = Self {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.initialize_schema()?;
        store.set_meta("schema_version", SCHEMA_VERSION)?;

        fs::write(&marker, SCHEMA_VERSION).map_err(|source| IndexError::IoFailure {
            path: marker.clone(),
            source,
        })?;

        info!("Opened symbol store at {}", db_path.display());
        Ok(store)
    }

    /// Open an in-memory store. Test-only convenience; schema applied, no
    /// marker file involved.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let mut store = Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        store.initialize_schema()?;
        store.set_meta("schema_version", SCHEMA_VERSION)?;
        Ok(store)
    }

    /// Path of the version marker file sitting next to the database.
    pub fn version_marker_path(db_path: &Path) -> PathBuf {
        db_path.with_extension("v1")
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Open the file just long enough to run `PRAGMA integrity_check`.
    fn probe_integrity(db_path: &Path) -> bool {
        match Connection::open(db_path) {
            Ok(conn) => conn
                .query_row("PRAGMA integrity_check", [], |row| row.get::<_, String>(0))
                .map(|answer| answer.eq_ignore_ascii_case("ok"))
                .unwrap_or(false),
            Err(e) => {
                debug!("Integrity probe could not open {}: {}", db_path.display(), e);
                false
            }
        }
    }

    fn remove_database_files(db_path: &Path) {
        for suffix in ["", "-wal", "-shm"] {
            let mut victim = db_path.as_os_str().to_owned();
            victim.push(suffix);
            let victim = PathBuf::from(victim);
            if victim.exists() {
                if let Err(e) = fs::remove_file(&victim) {
                    warn!("Failed to remove {}: {}", victim.display(), e);
                }
            }
        }
    }

    // ---- Raw statement helpers ----

    /// Execute a statement (or several, `;`-separated) without parameters.
    pub fn exec(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run one mutating statement, returning the last inserted rowid and the
    /// number of affected rows.
    pub fn run<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<RunResult> {
        let changes = self.conn.execute(sql, params)?;
        Ok(RunResult {
            last_id: self.conn.last_insert_rowid(),
            changes,
        })
    }

    /// Fetch a single row, mapped by `map`. The read path is best-effort:
    /// failures (including no rows) come back as None and are logged at debug
    /// level rather than surfaced.
    pub fn get<T, P, F>(&self, sql: &str, params: P, map: F) -> Option<T>
    where
        P: rusqlite::Params,
        F: FnOnce(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        match self.conn.query_row(sql, params, map) {
            Ok(value) => Some(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                debug!("get failed for '{}': {}", sql, e);
                None
            }
        }
    }

    /// Fetch all rows, mapped by `map`. Failures surface as `StoreFailure`.
    pub fn all<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>>
    where
        P: rusqlite::Params,
        F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
    {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    // ---- Transaction control ----

    /// Whether a transaction is currently active on this connection.
    pub fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    /// Begin a transaction. No-op when one is already active.
    pub fn begin(&self) -> Result<()> {
        if self.in_transaction() {
            debug!("begin: transaction already active, skipping");
            return Ok(());
        }
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    /// Commit the active transaction.
    pub fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    /// Roll back the active transaction. No-op outside a transaction.
    pub fn rollback(&self) -> Result<()> {
        if !self.in_transaction() {
            debug!("rollback: no active transaction, skipping");
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }

    /// Run `PRAGMA integrity_check` on the live connection.
    pub fn check_integrity(&self) -> bool {
        self.conn
            .query_row("PRAGMA integrity_check", [], |row| row.get::<_, String>(0))
            .map(|answer| answer.eq_ignore_ascii_case("ok"))
            .unwrap_or(false)
    }

    /// Close the store. An active transaction is rolled back first; if the
    /// clean close fails, the connection is dropped anyway (force close).
    pub fn close(self) -> Result<()> {
        if self.in_transaction() {
            warn!("Closing store with an active transaction; rolling back");
            let _ = self.rollback();
        }
        match self.conn.close() {
            Ok(()) => Ok(()),
            Err((conn, e)) => {
                warn!("Clean close failed ({}); force-closing", e);
                drop(conn);
                Err(e.into())
            }
        }
    }

    // ---- Workspace metadata ----

    pub fn set_meta(&self, key: &str, value: &str) -> Result<()> {
        self.run(
            "INSERT INTO workspace_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    pub fn get_meta(&self, key: &str) -> Option<String> {
        self.get(
            "SELECT value FROM workspace_meta WHERE key = ?1",
            rusqlite::params![key],
            |row| row.get(0),
        )
    }

    /// Aggregate counters for stats reporting.
    pub fn stats(&self) -> Result<StoreStats> {
        let files_count: i64 = self
            .get("SELECT COUNT(*) FROM files", [], |row| row.get(0))
            .unwrap_or(0);
        let symbols_count: i64 = self
            .get("SELECT COUNT(*) FROM symbols", [], |row| row.get(0))
            .unwrap_or(0);
        let keywords_count: i64 = self
            .get("SELECT COUNT(*) FROM keywords", [], |row| row.get(0))
            .unwrap_or(0);
        let relations_count: i64 = self
            .get("SELECT COUNT(*) FROM symbol_relations", [], |row| row.get(0))
            .unwrap_or(0);
        let last_indexed: Option<i64> = self
            .get("SELECT MAX(indexed_at) FROM files", [], |row| row.get(0))
            .flatten();

        Ok(StoreStats {
            files_count,
            symbols_count,
            keywords_count,
            relations_count,
            last_indexed,
        })
    }

    /// Empty every table. Callers wrap this in a coordinated transaction and
    /// stamp `last_reset` afterwards.
    pub fn clear_all(&self) -> Result<()> {
        // Child tables first to respect foreign keys.
        self.exec(
            "DELETE FROM symbol_relations;
             DELETE FROM symbol_contents;
             DELETE FROM keywords;
             DELETE FROM symbols;
             DELETE FROM files;",
        )?;
        debug!("Cleared all index tables");
        Ok(())
    }
}
