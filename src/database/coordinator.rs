// Transaction Coordinator
//
// Makes write transactions composable across asynchronous call chains that may
// themselves attempt to open transactions. All mutating operations route
// through here; the queue is a serialized mailbox, so at most one writer runs
// at a time and submission order is preserved. Readers are not gated.

use super::SymbolStore;
use crate::error::{IndexError, Result};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

type QueuedOp = Box<dyn FnOnce(&SymbolStore) + Send>;

/// Serializes and deduplicates nested transaction attempts against one store.
pub struct TransactionCoordinator {
    store: Arc<Mutex<SymbolStore>>,
    queue: Mutex<VecDeque<QueuedOp>>,
    processing: AtomicBool,
}

/// Process-wide registry, keyed by store path. Explicit init via
/// [`TransactionCoordinator::for_store`], explicit teardown via
/// [`TransactionCoordinator::shutdown`].
static COORDINATORS: OnceLock<Mutex<HashMap<PathBuf, Arc<TransactionCoordinator>>>> =
    OnceLock::new();

fn registry() -> &'static Mutex<HashMap<PathBuf, Arc<TransactionCoordinator>>> {
    COORDINATORS.get_or_init(|| Mutex::new(HashMap::new()))
}

impl TransactionCoordinator {
    pub fn new(store: Arc<Mutex<SymbolStore>>) -> Arc<Self> {
        Arc::new(Self {
            store,
            queue: Mutex::new(VecDeque::new()),
            processing: AtomicBool::new(false),
        })
    }

    /// Get or create the coordinator for the store at `db_path`.
    pub fn for_store(db_path: &Path, store: Arc<Mutex<SymbolStore>>) -> Arc<Self> {
        let mut map = registry().lock().expect("coordinator registry poisoned");
        map.entry(db_path.to_path_buf())
            .or_insert_with(|| Self::new(store))
            .clone()
    }

    /// Drop the registered coordinator for a store. Pending submitters keep
    /// their Arc and drain normally.
    pub fn shutdown(db_path: &Path) {
        let mut map = registry().lock().expect("coordinator registry poisoned");
        if map.remove(db_path).is_some() {
            debug!("Coordinator for {} shut down", db_path.display());
        }
    }

    pub fn store(&self) -> Arc<Mutex<SymbolStore>> {
        self.store.clone()
    }

    /// Run `op` inside a transaction.
    ///
    /// If a transaction is already active on the connection, `op` runs
    /// directly inside it (no nested begin). Otherwise the operation is
    /// appended to the queue and the processor drains entries one at a time:
    /// begin, run, commit — rolling back and resolving with the error on
    /// failure. A begin that still collides (raw SQL races) falls through to
    /// direct execution.
    pub async fn execute_in_transaction<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SymbolStore) -> Result<T> + Send + 'static,
    {
        // Probe current transaction state; re-entrant calls run directly.
        {
            let store = self.store.lock().expect("store mutex poisoned");
            if store.in_transaction() {
                debug!("execute_in_transaction: already in transaction, running directly");
                return op(&store);
            }
        }

        let (tx, rx) = oneshot::channel::<Result<T>>();
        let queued: QueuedOp = Box::new(move |store: &SymbolStore| {
            let outcome = Self::run_transactional(store, op);
            let _ = tx.send(outcome);
        });

        self.queue
            .lock()
            .expect("coordinator queue poisoned")
            .push_back(queued);
        self.process_queue();

        rx.await.unwrap_or_else(|_| {
            Err(IndexError::StoreFailure {
                cause: "transaction operation dropped before completion".to_string(),
            })
        })
    }

    fn run_transactional<T, F>(store: &SymbolStore, op: F) -> Result<T>
    where
        F: FnOnce(&SymbolStore) -> Result<T>,
    {
        match store.begin() {
            Ok(()) => {}
            // A transaction appeared between probe and begin: fall through to
            // direct execution inside it.
            Err(IndexError::TransactionConflict) => {
                debug!("begin collided with an active transaction, executing directly");
                return op(store);
            }
            Err(e) => return Err(e),
        }

        match op(store) {
            Ok(value) => {
                store.commit()?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = store.rollback() {
                    warn!("rollback after failed transaction also failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Drain the queue if no other caller is already draining it.
    fn process_queue(&self) {
        loop {
            if self.processing.swap(true, Ordering::SeqCst) {
                // Another caller is draining; it will see our entry.
                return;
            }

            loop {
                let next = self
                    .queue
                    .lock()
                    .expect("coordinator queue poisoned")
                    .pop_front();
                let Some(op) = next else { break };
                let store = self.store.lock().expect("store mutex poisoned");
                op(&store);
            }

            self.processing.store(false, Ordering::SeqCst);

            // An entry may have arrived after the drain loop saw an empty
            // queue but before the flag flipped; loop around for it.
            if self
                .queue
                .lock()
                .expect("coordinator queue poisoned")
                .is_empty()
            {
                return;
            }
        }
    }

    /// Like [`execute_in_transaction`], racing a deadline. On expiry the
    /// active transaction (if any) is rolled back and `Timeout` surfaces.
    ///
    /// [`execute_in_transaction`]: Self::execute_in_transaction
    pub async fn execute_with_timeout<T, F>(&self, op: F, ms: u64) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&SymbolStore) -> Result<T> + Send + 'static,
    {
        match tokio::time::timeout(Duration::from_millis(ms), self.execute_in_transaction(op)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("coordinated transaction exceeded {}ms deadline", ms);
                if let Ok(store) = self.store.lock() {
                    let _ = store.rollback();
                }
                Err(IndexError::Timeout { ms })
            }
        }
    }

    /// Re-run `op` on retryable errors (database busy/locked, nested
    /// transaction signals) with exponential backoff: 100ms × 2^attempt.
    pub async fn execute_with_retry<T, F>(&self, op: F, max_retries: u32) -> Result<T>
    where
        T: Send + 'static,
        F: Fn(&SymbolStore) -> Result<T> + Clone + Send + 'static,
    {
        let mut attempt = 0;
        loop {
            match self.execute_in_transaction(op.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let backoff = Duration::from_millis(100 * (1 << attempt));
                    debug!(
                        "retryable store error ({}), attempt {}/{}, backing off {:?}",
                        e,
                        attempt + 1,
                        max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
