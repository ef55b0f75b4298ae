// Code Index Manager
//
// The operation surface the host calls. Owns the store, the transaction
// coordinator, the incremental indexer, the reference resolver, and the query
// engine for one workspace.

use crate::config::IndexConfig;
use crate::database::{SymbolStore, TransactionCoordinator};
use crate::error::{IndexError, Result};
use crate::indexer::{IncrementalIndexer, IndexProgress, IndexStatus};
use crate::resolver::{Location, ReferenceResolver, ResolveOptions};
use crate::search::{QueryEngine, SearchOptions, SearchResult};
use crate::utils::{identity, paths};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Subdirectory of the host storage root that holds per-workspace databases.
pub const STORAGE_SUBDIR: &str = "workspace_indexing";

/// Aggregate index statistics for the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub files_count: i64,
    pub symbols_count: i64,
    pub keywords_count: i64,
    pub last_indexed: Option<DateTime<Utc>>,
    pub status: IndexStatus,
}

/// Per-workspace indexing and search facade.
pub struct CodeIndexManager {
    workspace_root: PathBuf,
    workspace_id: String,
    db_path: PathBuf,
    store: Arc<Mutex<SymbolStore>>,
    coordinator: Arc<TransactionCoordinator>,
    indexer: IncrementalIndexer,
    resolver: ReferenceResolver,
    engine: QueryEngine,
}

impl CodeIndexManager {
    /// Open (or create) the index for a workspace. The store lives under
    /// `<storage_root>/workspace_indexing/<workspace_id>.db`, where the id is
    /// a pure function of the workspace path.
    pub fn initialize(
        workspace_path: &Path,
        storage_root: &Path,
        config: IndexConfig,
    ) -> Result<Self> {
        if workspace_path.as_os_str().is_empty() {
            return Err(IndexError::invalid_argument("empty workspace path"));
        }

        let workspace_id = identity::workspace_id(&paths::to_posix_string(workspace_path));
        let db_path = storage_root
            .join(STORAGE_SUBDIR)
            .join(format!("{workspace_id}.db"));

        let store = Arc::new(Mutex::new(SymbolStore::open(&db_path)?));
        let coordinator = TransactionCoordinator::for_store(&db_path, store.clone());
        let indexer = IncrementalIndexer::new(
            workspace_path.to_path_buf(),
            config,
            coordinator.clone(),
        );
        let resolver = ReferenceResolver::new(workspace_path.to_path_buf());
        let engine = QueryEngine::new(store.clone());

        info!(
            "Initialized index manager for {} (workspace {})",
            workspace_path.display(),
            workspace_id
        );

        Ok(Self {
            workspace_root: workspace_path.to_path_buf(),
            workspace_id,
            db_path,
            store,
            coordinator,
            indexer,
            resolver,
            engine,
        })
    }

    pub fn workspace_id(&self) -> &str {
        &self.workspace_id
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Scan the workspace and ingest everything stale.
    pub async fn start_indexing(&self) -> Result<()> {
        self.indexer.start_indexing().await
    }

    /// Cancel any in-flight run and rescan from scratch.
    pub async fn refresh_index(&self) -> Result<()> {
        self.indexer.refresh().await
    }

    /// Empty the index and stamp `last_reset`.
    pub async fn clear_index(&self) -> Result<()> {
        self.indexer.clear().await
    }

    /// Ingest one file (file-watcher notification path).
    pub async fn index_file(&self, path: &str) -> Result<()> {
        self.indexer.index_file(path).await
    }

    /// Drop one file's rows (file-watcher deletion path).
    pub async fn remove_file_from_index(&self, path: &str) -> Result<()> {
        self.indexer.remove_file(path).await
    }

    pub fn get_index_stats(&self) -> Result<IndexStats> {
        let stats = {
            let store = self.store.lock().expect("store mutex poisoned");
            store.stats()?
        };
        Ok(IndexStats {
            files_count: stats.files_count,
            symbols_count: stats.symbols_count,
            keywords_count: stats.keywords_count,
            last_indexed: stats
                .last_indexed
                .and_then(DateTime::<Utc>::from_timestamp_millis),
            status: self.indexer.progress().status,
        })
    }

    pub fn get_progress(&self) -> IndexProgress {
        self.indexer.progress()
    }

    /// Tell the scheduler which files the host is viewing (priority 100).
    pub fn set_viewed_files(&self, paths: impl IntoIterator<Item = String>) {
        self.indexer.set_viewed_files(paths);
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        self.engine.search(query, options)
    }

    pub async fn find_references(
        &self,
        symbol: &str,
        file: &str,
        line: u32,
        column: u32,
        options: &ResolveOptions,
    ) -> Result<Vec<Location>> {
        self.resolver
            .find_references(symbol, file, line, column, options)
            .await
    }

    pub fn find_implementations(&self, interface_name: &str) -> Result<Vec<SearchResult>> {
        self.engine.find_implementations(interface_name)
    }

    /// Drop expired resolver cache entries.
    pub fn clean_expired_caches(&self) {
        self.resolver.clean_expired();
    }

    /// Tear down the process-wide coordinator entry and close the store when
    /// this manager is the last owner.
    pub fn shutdown(self) -> Result<()> {
        TransactionCoordinator::shutdown(&self.db_path);
        let Self {
            store,
            coordinator,
            indexer,
            engine,
            resolver,
            ..
        } = self;
        // The coordinator and engine hold store clones; release them first.
        drop(indexer);
        drop(engine);
        drop(resolver);
        drop(coordinator);
        match Arc::try_unwrap(store) {
            Ok(mutex) => {
                let store = mutex.into_inner().expect("store mutex poisoned");
                store.close()
            }
            Err(_) => Ok(()),
        }
    }
}
