// Keyword posting operations

use super::{SymbolStore, types::KeywordPosting};
use crate::error::Result;
use rusqlite::params;
use tracing::debug;

impl SymbolStore {
    /// Insert keyword postings. The primary key is (keyword, symbol_id);
    /// duplicates within a batch collapse onto the higher relevance.
    pub fn insert_keywords(&self, postings: &[KeywordPosting]) -> Result<()> {
        for posting in postings {
            self.run(
                "INSERT INTO keywords (keyword, symbol_id, relevance)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(keyword, symbol_id) DO UPDATE SET
                     relevance = MAX(relevance, excluded.relevance)",
                params![posting.keyword, posting.symbol_id, posting.relevance],
            )?;
        }
        debug!("Inserted {} keyword postings", postings.len());
        Ok(())
    }

    pub fn keywords_for_symbol(&self, symbol_id: i64) -> Result<Vec<(String, f64)>> {
        self.all(
            "SELECT keyword, relevance FROM keywords WHERE symbol_id = ?1 ORDER BY keyword",
            params![symbol_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }
}
