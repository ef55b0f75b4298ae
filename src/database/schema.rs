// Database schema initialization and table creation

use super::SymbolStore;
use crate::error::Result;
use tracing::debug;

impl SymbolStore {
    /// Initialize the complete database schema. Idempotent.
    pub(super) fn initialize_schema(&mut self) -> Result<()> {
        debug!("Creating database schema");

        // Create tables in dependency order
        self.create_files_table()?;
        self.create_symbols_table()?;
        self.create_symbol_contents_table()?;
        self.create_keywords_table()?;
        self.create_symbol_relations_table()?;
        self.create_workspace_meta_table()?;

        debug!("Database schema created successfully");
        Ok(())
    }

    fn create_files_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                path TEXT NOT NULL UNIQUE,
                language TEXT NOT NULL,
                last_modified INTEGER NOT NULL,
                indexed_at INTEGER NOT NULL DEFAULT 0,
                content_hash TEXT NOT NULL
            )",
        )?;

        self.exec("CREATE INDEX IF NOT EXISTS idx_files_path ON files(path)")?;
        self.exec("CREATE INDEX IF NOT EXISTS idx_files_content_hash ON files(content_hash)")?;

        debug!("Created files table and indexes");
        Ok(())
    }

    fn create_symbols_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS symbols (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                file_id INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                type TEXT NOT NULL,
                signature TEXT,
                line INTEGER NOT NULL,
                \"column\" INTEGER NOT NULL,
                parent_id INTEGER REFERENCES symbols(id) ON DELETE SET NULL
            )",
        )?;

        self.exec("CREATE INDEX IF NOT EXISTS idx_symbols_file_id ON symbols(file_id)")?;
        self.exec("CREATE INDEX IF NOT EXISTS idx_symbols_name ON symbols(name)")?;
        self.exec("CREATE INDEX IF NOT EXISTS idx_symbols_type ON symbols(type)")?;
        self.exec("CREATE INDEX IF NOT EXISTS idx_symbols_parent_id ON symbols(parent_id)")?;

        debug!("Created symbols table and indexes");
        Ok(())
    }

    fn create_symbol_contents_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS symbol_contents (
                symbol_id INTEGER PRIMARY KEY REFERENCES symbols(id) ON DELETE CASCADE,
                content TEXT NOT NULL
            )",
        )?;

        debug!("Created symbol_contents table");
        Ok(())
    }

    fn create_keywords_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS keywords (
                keyword TEXT NOT NULL,
                symbol_id INTEGER NOT NULL REFERENCES symbols(id) ON DELETE CASCADE,
                relevance REAL NOT NULL DEFAULT 0,
                PRIMARY KEY (keyword, symbol_id)
            )",
        )?;

        self.exec("CREATE INDEX IF NOT EXISTS idx_keywords_keyword ON keywords(keyword)")?;
        self.exec("CREATE INDEX IF NOT EXISTS idx_keywords_symbol_id ON keywords(symbol_id)")?;

        debug!("Created keywords table and indexes");
        Ok(())
    }

    fn create_symbol_relations_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS symbol_relations (
                source_id INTEGER NOT NULL REFERENCES symbols(id) ON DELETE CASCADE,
                target_id INTEGER NOT NULL REFERENCES symbols(id) ON DELETE CASCADE,
                relation_type TEXT NOT NULL,
                PRIMARY KEY (source_id, target_id, relation_type)
            )",
        )?;

        self.exec(
            "CREATE INDEX IF NOT EXISTS idx_relations_source ON symbol_relations(source_id)",
        )?;
        self.exec(
            "CREATE INDEX IF NOT EXISTS idx_relations_target ON symbol_relations(target_id)",
        )?;
        self.exec(
            "CREATE INDEX IF NOT EXISTS idx_relations_type ON symbol_relations(relation_type)",
        )?;

        debug!("Created symbol_relations table and indexes");
        Ok(())
    }

    fn create_workspace_meta_table(&self) -> Result<()> {
        self.exec(
            "CREATE TABLE IF NOT EXISTS workspace_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;

        debug!("Created workspace_meta table");
        Ok(())
    }
}
