// Incremental Indexer
//
// Keeps the symbol store in sync with the workspace: scan, diff against the
// store, then ingest stale files in prioritized batches. Ingestion-scope
// errors never propagate past a single file; scan-wide failures flip the
// progress status to `error`.

pub mod diff;
pub mod ingest;
pub mod scanner;

use crate::config::IndexConfig;
use crate::database::TransactionCoordinator;
use crate::error::{IndexError, Result};
use crate::ignore::IgnoreController;
use crate::parsing::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, warn};

/// Indexing lifecycle states surfaced through progress reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexStatus {
    Idle,
    Scanning,
    Indexing,
    Completed,
    Error,
}

impl IndexStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::Indexing => "indexing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

/// Progress snapshot: `{total, completed, status}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexProgress {
    pub total: usize,
    pub completed: usize,
    pub status: IndexStatus,
}

impl Default for IndexProgress {
    fn default() -> Self {
        Self {
            total: 0,
            completed: 0,
            status: IndexStatus::Idle,
        }
    }
}

impl IndexProgress {
    /// Wire shape for hosts that multiplex progress reports.
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "status": self.status.as_str(),
            "total": self.total,
            "completed": self.completed,
        })
    }
}

/// Drives workspace scans and per-file ingestion against the store.
pub struct IncrementalIndexer {
    workspace_root: PathBuf,
    config: IndexConfig,
    coordinator: Arc<TransactionCoordinator>,
    progress: Arc<Mutex<IndexProgress>>,
    /// Cancellation flag: cleared by `refresh`/`clear`, checked at batch
    /// boundaries. In-flight files finish; no new batch starts.
    is_indexing: Arc<AtomicBool>,
    /// Serializes pipeline runs so refresh can wait out a cancelled run.
    pipeline_lock: tokio::sync::Mutex<()>,
    /// Paths the host currently has open, for scheduling priority.
    viewed_files: Arc<Mutex<HashSet<String>>>,
}

impl IncrementalIndexer {
    pub fn new(
        workspace_root: PathBuf,
        config: IndexConfig,
        coordinator: Arc<TransactionCoordinator>,
    ) -> Self {
        Self {
            workspace_root,
            config,
            coordinator,
            progress: Arc::new(Mutex::new(IndexProgress::default())),
            is_indexing: Arc::new(AtomicBool::new(false)),
            pipeline_lock: tokio::sync::Mutex::new(()),
            viewed_files: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn progress(&self) -> IndexProgress {
        self.progress
            .lock()
            .expect("progress mutex poisoned")
            .clone()
    }

    /// Tell the scheduler which files the host is currently viewing.
    pub fn set_viewed_files(&self, paths: impl IntoIterator<Item = String>) {
        let mut viewed = self.viewed_files.lock().expect("viewed mutex poisoned");
        viewed.clear();
        viewed.extend(paths);
    }

    fn set_progress(&self, total: usize, completed: usize, status: IndexStatus) {
        let mut progress = self.progress.lock().expect("progress mutex poisoned");
        progress.total = total;
        progress.completed = completed;
        progress.status = status;
    }

    /// Scan the workspace and ingest everything stale.
    pub async fn start_indexing(&self) -> Result<()> {
        let _run = self.pipeline_lock.lock().await;
        self.is_indexing.store(true, Ordering::SeqCst);

        let result = self.run_pipeline().await;
        self.is_indexing.store(false, Ordering::SeqCst);

        match &result {
            Ok(()) => {
                let progress = self.progress();
                self.set_progress(progress.total, progress.completed, IndexStatus::Completed);
            }
            Err(e) => {
                error!("Indexing failed: {}", e);
                let progress = self.progress();
                self.set_progress(progress.total, progress.completed, IndexStatus::Error);
            }
        }
        result
    }

    /// Cancel any in-flight run and start over.
    pub async fn refresh(&self) -> Result<()> {
        self.is_indexing.store(false, Ordering::SeqCst);
        // start_indexing waits on the pipeline lock, so the cancelled run
        // finishes its current batch before the rescan begins.
        self.start_indexing().await
    }

    /// Empty all tables and stamp `last_reset`.
    pub async fn clear(&self) -> Result<()> {
        self.is_indexing.store(false, Ordering::SeqCst);
        let _run = self.pipeline_lock.lock().await;

        let reset_at = ingest::now_ms();
        self.coordinator
            .execute_with_timeout(
                move |store| {
                    store.clear_all()?;
                    store.set_meta("last_reset", &reset_at.to_string())?;
                    Ok(())
                },
                self.config.transaction_timeout_ms,
            )
            .await?;

        self.set_progress(0, 0, IndexStatus::Idle);
        info!("Index cleared");
        Ok(())
    }

    /// Ingest a single file as a standalone transaction (file-watcher path).
    /// Relations whose targets are still missing are dropped; the defining
    /// file will re-link them when it is indexed.
    pub async fn index_file(&self, path: &str) -> Result<()> {
        let relative = self.to_workspace_relative(path)?;
        let unresolved =
            ingest::ingest_file(&self.coordinator, &self.workspace_root, &relative).await?;
        if !unresolved.is_empty() {
            debug!(
                "{} relation target(s) not yet indexed for {}",
                unresolved.len(),
                relative
            );
        }
        Ok(())
    }

    /// Remove a single file's rows as a standalone transaction, retrying on
    /// transient lock contention.
    pub async fn remove_file(&self, path: &str) -> Result<()> {
        let relative = self.to_workspace_relative(path)?;
        self.coordinator
            .execute_with_retry(
                move |store| {
                    store.delete_file_by_path(&relative)?;
                    Ok(())
                },
                self.config.max_retries,
            )
            .await
    }

    fn to_workspace_relative(&self, path: &str) -> Result<String> {
        if path.trim().is_empty() {
            return Err(IndexError::invalid_argument("empty file path"));
        }
        let candidate = Path::new(path);
        Ok(if candidate.is_absolute() {
            crate::utils::paths::to_relative_posix(candidate, &self.workspace_root)
        } else {
            crate::utils::paths::to_posix_string(candidate)
        })
    }

    async fn run_pipeline(&self) -> Result<()> {
        self.set_progress(0, 0, IndexStatus::Scanning);
        let ignore = IgnoreController::new(&self.workspace_root);

        let scanned = scanner::scan_workspace(&self.workspace_root, &self.config, &ignore).await?;

        // Readers are not gated; take the freshness snapshot directly.
        let stored = {
            let store = self
                .coordinator
                .store();
            let store = store.lock().expect("store mutex poisoned");
            store.all_file_freshness()?
        };

        let diff = diff::compute_diff(&scanned, &stored);
        info!(
            "Diff: {} to update, {} to delete ({} scanned)",
            diff.to_update.len(),
            diff.to_delete.len(),
            scanned.len()
        );

        // Deletions and new file rows go in one batched transaction.
        let to_delete = diff.to_delete.clone();
        let new_rows: Vec<(String, String, i64)> = diff
            .to_update
            .iter()
            .filter(|file| !stored.contains_key(&file.relative))
            .map(|file| {
                let language = Language::from_path(&file.absolute).name().to_string();
                (file.relative.clone(), language, file.last_modified)
            })
            .collect();
        if !to_delete.is_empty() || !new_rows.is_empty() {
            self.coordinator
                .execute_with_timeout(
                    move |store| {
                        for path in &to_delete {
                            store.delete_file_by_path(path)?;
                        }
                        // New rows start with zero freshness so a crash before
                        // ingestion leaves them stale and retried.
                        for (path, language, last_modified) in &new_rows {
                            store.upsert_file(path, language, *last_modified, 0, "0")?;
                        }
                        Ok(())
                    },
                    self.config.transaction_timeout_ms,
                )
                .await?;
        }

        // Prioritize: viewed files first, then priority directories.
        let viewed = self
            .viewed_files
            .lock()
            .expect("viewed mutex poisoned")
            .clone();
        let mut tasks: Vec<(u8, String)> = diff
            .to_update
            .iter()
            .map(|file| {
                let priority = ingest::task_priority(
                    &file.relative,
                    &self.config.include_dirs,
                    viewed.contains(&file.relative),
                );
                (priority, file.relative.clone())
            })
            .collect();
        tasks.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

        let total = tasks.len();
        let mut completed = 0usize;
        let mut unresolved_relations: Vec<ingest::UnresolvedRelation> = Vec::new();
        self.set_progress(total, 0, IndexStatus::Indexing);

        for batch in tasks.chunks(self.config.batch_size.max(1)) {
            if !self.is_indexing.load(Ordering::SeqCst) {
                debug!("Indexing cancelled after {}/{} files", completed, total);
                break;
            }

            let ingests = batch.iter().map(|(_, relative)| {
                let relative = relative.clone();
                async move {
                    let outcome =
                        ingest::ingest_file(&self.coordinator, &self.workspace_root, &relative)
                            .await;
                    match outcome {
                        Ok(unresolved) => unresolved,
                        Err(e) => {
                            match e {
                                IndexError::NotFound { .. }
                                | IndexError::IoFailure { .. }
                                | IndexError::ParserUnavailable { .. } => {
                                    warn!("Skipping {}: {}", relative, e);
                                }
                                _ => {
                                    error!("Failed to ingest {}: {}", relative, e);
                                }
                            }
                            Vec::new()
                        }
                    }
                }
            });
            for unresolved in futures::future::join_all(ingests).await {
                unresolved_relations.extend(unresolved);
            }

            completed += batch.len();
            self.set_progress(total, completed, IndexStatus::Indexing);

            // Zero-delay yield lets the host interleave other work.
            tokio::task::yield_now().await;
        }

        // Re-link relations whose targets arrived later in the run.
        if !unresolved_relations.is_empty() {
            self.coordinator
                .execute_in_transaction(move |store| {
                    let mut linked = 0usize;
                    for relation in &unresolved_relations {
                        if let Some(target_id) = store.find_relation_target(&relation.target_name)
                        {
                            store.insert_relation(
                                relation.source_id,
                                target_id,
                                relation.relation_type,
                            )?;
                            linked += 1;
                        }
                    }
                    debug!("Re-linked {} deferred relation(s)", linked);
                    Ok(())
                })
                .await?;
        }

        Ok(())
    }
}
