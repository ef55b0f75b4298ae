// Symbol relation edge operations

use super::{SymbolStore, types::RelationType};
use crate::error::Result;
use rusqlite::params;

impl SymbolStore {
    /// Insert one relation edge. The triple is the primary key, so re-inserts
    /// are no-ops.
    pub fn insert_relation(
        &self,
        source_id: i64,
        target_id: i64,
        relation_type: RelationType,
    ) -> Result<()> {
        self.run(
            "INSERT OR IGNORE INTO symbol_relations (source_id, target_id, relation_type)
             VALUES (?1, ?2, ?3)",
            params![source_id, target_id, relation_type.as_str()],
        )?;
        Ok(())
    }

    /// Ids of symbols whose `implements`/`extends` edges point at any symbol
    /// with the given name. Drives `find_implementations`.
    pub fn find_implementor_ids(&self, interface_name: &str) -> Result<Vec<i64>> {
        self.all(
            "SELECT DISTINCT r.source_id
             FROM symbol_relations r
             JOIN symbols target ON target.id = r.target_id
             WHERE target.name = ?1
               AND r.relation_type IN ('implements', 'extends')",
            params![interface_name],
            |row| row.get(0),
        )
    }

    pub fn relations_for_symbol(&self, symbol_id: i64) -> Result<Vec<(i64, i64, RelationType)>> {
        let rows = self.all(
            "SELECT source_id, target_id, relation_type
             FROM symbol_relations
             WHERE source_id = ?1 OR target_id = ?1",
            params![symbol_id],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )?;
        Ok(rows
            .into_iter()
            .filter_map(|(source, target, kind)| {
                RelationType::parse(&kind).map(|k| (source, target, k))
            })
            .collect())
    }
}
