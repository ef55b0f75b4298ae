// Symbol row operations

use super::{
    SymbolStore,
    types::{NewSymbol, SymbolRecord, SymbolType},
};
use crate::error::{IndexError, Result};
use rusqlite::params;
use tracing::debug;

fn map_symbol_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SymbolRecord> {
    let type_str: String = row.get(3)?;
    let symbol_type = SymbolType::parse(&type_str).unwrap_or(SymbolType::Variable);
    Ok(SymbolRecord {
        id: row.get(0)?,
        file_id: row.get(1)?,
        name: row.get(2)?,
        symbol_type,
        signature: row.get(4)?,
        line: row.get::<_, i64>(5)? as u32,
        column: row.get::<_, i64>(6)? as u32,
        parent_id: row.get(7)?,
    })
}

const SYMBOL_COLUMNS: &str = "id, file_id, name, type, signature, line, \"column\", parent_id";

impl SymbolStore {
    /// Insert a batch of symbols for one file, plus the 1:1 content rows.
    /// Parent links are wired in a second pass so a parent may appear
    /// anywhere in the batch. Returns the new ids in input order. Meant to
    /// run inside a coordinated transaction.
    pub fn insert_symbols(&self, file_id: i64, symbols: &[NewSymbol]) -> Result<Vec<i64>> {
        let mut ids: Vec<i64> = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let result = self.run(
                "INSERT INTO symbols (file_id, name, type, signature, line, \"column\", parent_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
                params![
                    file_id,
                    symbol.name,
                    symbol.symbol_type.as_str(),
                    symbol.signature,
                    symbol.line as i64,
                    symbol.column as i64,
                ],
            )?;

            self.run(
                "INSERT INTO symbol_contents (symbol_id, content) VALUES (?1, ?2)",
                params![result.last_id, symbol.content],
            )?;

            ids.push(result.last_id);
        }

        for (index, symbol) in symbols.iter().enumerate() {
            let Some(parent_index) = symbol.parent else {
                continue;
            };
            let parent_id = ids.get(parent_index).copied().ok_or_else(|| {
                IndexError::StoreFailure {
                    cause: format!(
                        "symbol '{}' references parent index {} outside the batch",
                        symbol.name, parent_index
                    ),
                }
            })?;
            self.run(
                "UPDATE symbols SET parent_id = ?1 WHERE id = ?2",
                params![parent_id, ids[index]],
            )?;
        }

        debug!("Inserted {} symbols for file {}", ids.len(), file_id);
        Ok(ids)
    }

    pub fn get_symbols_for_file(&self, file_id: i64) -> Result<Vec<SymbolRecord>> {
        self.all(
            &format!(
                "SELECT {SYMBOL_COLUMNS} FROM symbols WHERE file_id = ?1 ORDER BY line, \"column\""
            ),
            params![file_id],
            map_symbol_row,
        )
    }

    pub fn get_symbols_by_name(&self, name: &str) -> Result<Vec<SymbolRecord>> {
        self.all(
            &format!("SELECT {SYMBOL_COLUMNS} FROM symbols WHERE name = ?1"),
            params![name],
            map_symbol_row,
        )
    }

    pub fn get_symbol_by_id(&self, id: i64) -> Option<SymbolRecord> {
        self.get(
            &format!("SELECT {SYMBOL_COLUMNS} FROM symbols WHERE id = ?1"),
            params![id],
            map_symbol_row,
        )
    }

    /// The stored source line for a symbol.
    pub fn get_symbol_content(&self, symbol_id: i64) -> Option<String> {
        self.get(
            "SELECT content FROM symbol_contents WHERE symbol_id = ?1",
            params![symbol_id],
            |row| row.get(0),
        )
    }

    /// Resolve a symbol name to an id, preferring class-like rows. Used when
    /// wiring relation edges whose target lives in another file.
    pub fn find_relation_target(&self, name: &str) -> Option<i64> {
        let candidates = self.get_symbols_by_name(name).ok()?;
        candidates
            .iter()
            .find(|s| s.symbol_type.is_class_like())
            .or_else(|| candidates.first())
            .map(|s| s.id)
    }
}
