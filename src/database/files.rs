// File row operations

use super::{SymbolStore, types::FileRecord};
use crate::error::Result;
use rusqlite::params;
use std::collections::HashMap;
use tracing::debug;

fn map_file_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FileRecord> {
    Ok(FileRecord {
        id: row.get(0)?,
        path: row.get(1)?,
        language: row.get(2)?,
        last_modified: row.get(3)?,
        indexed_at: row.get(4)?,
        content_hash: row.get(5)?,
    })
}

const FILE_COLUMNS: &str = "id, path, language, last_modified, indexed_at, content_hash";

impl SymbolStore {
    /// Insert or update a file row by path, returning its id.
    pub fn upsert_file(
        &self,
        path: &str,
        language: &str,
        last_modified: i64,
        indexed_at: i64,
        content_hash: &str,
    ) -> Result<i64> {
        self.run(
            "INSERT INTO files (path, language, last_modified, indexed_at, content_hash)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(path) DO UPDATE SET
                 language = excluded.language,
                 last_modified = excluded.last_modified,
                 indexed_at = excluded.indexed_at,
                 content_hash = excluded.content_hash",
            params![path, language, last_modified, indexed_at, content_hash],
        )?;

        // The upsert's last_id is unreliable on the update path, so read back.
        let id = self
            .get(
                "SELECT id FROM files WHERE path = ?1",
                params![path],
                |row| row.get::<_, i64>(0),
            )
            .ok_or_else(|| crate::error::IndexError::StoreFailure {
                cause: format!("file row missing after upsert: {path}"),
            })?;

        debug!("Upserted file row {} for {}", id, path);
        Ok(id)
    }

    pub fn get_file_by_path(&self, path: &str) -> Option<FileRecord> {
        self.get(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE path = ?1"),
            params![path],
            map_file_row,
        )
    }

    pub fn get_file_by_id(&self, id: i64) -> Option<FileRecord> {
        self.get(
            &format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?1"),
            params![id],
            map_file_row,
        )
    }

    pub fn all_files(&self) -> Result<Vec<FileRecord>> {
        self.all(
            &format!("SELECT {FILE_COLUMNS} FROM files ORDER BY path"),
            [],
            map_file_row,
        )
    }

    /// `path -> content_hash` for every stored file; the diff input.
    pub fn all_file_freshness(&self) -> Result<HashMap<String, String>> {
        let rows = self.all("SELECT path, content_hash FROM files", [], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        Ok(rows.into_iter().collect())
    }

    /// Delete a file row and everything hanging off it, in foreign-key order.
    /// Meant to run inside a coordinated transaction.
    pub fn delete_file_by_path(&self, path: &str) -> Result<usize> {
        let Some(file) = self.get_file_by_path(path) else {
            return Ok(0);
        };
        self.delete_file_dependents(file.id)?;
        let result = self.run("DELETE FROM files WHERE id = ?1", params![file.id])?;
        debug!("Deleted file record for {}", path);
        Ok(result.changes)
    }

    /// Delete symbol_relations, symbol_contents, keywords, and symbols for a
    /// file, in that order.
    pub fn delete_file_dependents(&self, file_id: i64) -> Result<()> {
        self.run(
            "DELETE FROM symbol_relations WHERE source_id IN
                 (SELECT id FROM symbols WHERE file_id = ?1)
             OR target_id IN
                 (SELECT id FROM symbols WHERE file_id = ?1)",
            params![file_id],
        )?;
        self.run(
            "DELETE FROM symbol_contents WHERE symbol_id IN
                 (SELECT id FROM symbols WHERE file_id = ?1)",
            params![file_id],
        )?;
        self.run(
            "DELETE FROM keywords WHERE symbol_id IN
                 (SELECT id FROM symbols WHERE file_id = ?1)",
            params![file_id],
        )?;
        self.run("DELETE FROM symbols WHERE file_id = ?1", params![file_id])?;
        Ok(())
    }
}
