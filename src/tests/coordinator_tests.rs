// Transaction coordinator tests: serialization, submission order,
// re-entrancy, rollback on failure, and retry behavior.

#[cfg(test)]
mod coordinator {
    use crate::database::{SymbolStore, TransactionCoordinator};
    use crate::error::IndexError;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn store_and_coordinator() -> (Arc<Mutex<SymbolStore>>, Arc<TransactionCoordinator>) {
        let store = Arc::new(Mutex::new(SymbolStore::open_in_memory().unwrap()));
        let coordinator = TransactionCoordinator::new(store.clone());
        (store, coordinator)
    }

    #[tokio::test]
    async fn commits_on_success() {
        let (store, coordinator) = store_and_coordinator();
        coordinator
            .execute_in_transaction(|store| store.set_meta("key", "value"))
            .await
            .unwrap();

        let store = store.lock().unwrap();
        assert!(!store.in_transaction());
        assert_eq!(store.get_meta("key").as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn rolls_back_on_failure() {
        let (store, coordinator) = store_and_coordinator();
        let result: Result<(), _> = coordinator
            .execute_in_transaction(|store| {
                store.set_meta("doomed", "value")?;
                Err(IndexError::StoreFailure {
                    cause: "boom".to_string(),
                })
            })
            .await;
        assert!(result.is_err());

        let store = store.lock().unwrap();
        assert!(!store.in_transaction());
        assert_eq!(store.get_meta("doomed"), None);
    }

    #[tokio::test]
    async fn preserves_submission_order() {
        let (store, coordinator) = store_and_coordinator();
        for i in 0..5 {
            coordinator
                .execute_in_transaction(move |store| {
                    let previous = store.get_meta("order").unwrap_or_default();
                    store.set_meta("order", &format!("{previous}{i}"))
                })
                .await
                .unwrap();
        }
        let store = store.lock().unwrap();
        assert_eq!(store.get_meta("order").as_deref(), Some("01234"));
    }

    #[tokio::test]
    async fn runs_directly_inside_active_transaction() {
        let (store, coordinator) = store_and_coordinator();

        // Open a transaction out-of-band; the coordinator must not try to
        // nest another one, and must leave the outer transaction open.
        store.lock().unwrap().begin().unwrap();
        coordinator
            .execute_in_transaction(|store| {
                assert!(store.in_transaction());
                store.set_meta("inner", "ran")
            })
            .await
            .unwrap();

        let store = store.lock().unwrap();
        assert!(store.in_transaction());
        store.rollback().unwrap();
        // The inner write was part of the outer transaction, so it rolled
        // back with it.
        assert_eq!(store.get_meta("inner"), None);
    }

    #[tokio::test]
    async fn retries_busy_errors_with_backoff() {
        let (_store, coordinator) = store_and_coordinator();
        let attempts = Arc::new(AtomicU32::new(0));

        let counter = attempts.clone();
        let result = coordinator
            .execute_with_retry(
                move |store| {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        Err(IndexError::BusyRetryable {
                            cause: "database is locked".to_string(),
                        })
                    } else {
                        store.set_meta("retried", "yes")
                    }
                },
                3,
            )
            .await;

        assert!(result.is_ok());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn retry_gives_up_after_max_attempts() {
        let (_store, coordinator) = store_and_coordinator();
        let attempts = Arc::new(AtomicU32::new(0));

        let counter = attempts.clone();
        let result: Result<(), _> = coordinator
            .execute_with_retry(
                move |_store| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(IndexError::BusyRetryable {
                        cause: "database is locked".to_string(),
                    })
                },
                2,
            )
            .await;

        assert!(matches!(result, Err(IndexError::BusyRetryable { .. })));
        // Initial attempt plus two retries.
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        let (_store, coordinator) = store_and_coordinator();
        let attempts = Arc::new(AtomicU32::new(0));

        let counter = attempts.clone();
        let result: Result<(), _> = coordinator
            .execute_with_retry(
                move |_store| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(IndexError::StoreFailure {
                        cause: "syntax error".to_string(),
                    })
                },
                3,
            )
            .await;

        assert!(matches!(result, Err(IndexError::StoreFailure { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn timeout_wrapper_passes_through_fast_operations() {
        let (_store, coordinator) = store_and_coordinator();
        let value = coordinator
            .execute_with_timeout(|store| store.set_meta("fast", "ok").map(|_| 42), 30_000)
            .await
            .unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn registry_hands_out_one_coordinator_per_store() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("ws.db");
        let store = Arc::new(Mutex::new(SymbolStore::open(&db_path).unwrap()));

        let a = TransactionCoordinator::for_store(&db_path, store.clone());
        let b = TransactionCoordinator::for_store(&db_path, store.clone());
        assert!(Arc::ptr_eq(&a, &b));

        TransactionCoordinator::shutdown(&db_path);
        let c = TransactionCoordinator::for_store(&db_path, store);
        assert!(!Arc::ptr_eq(&a, &c));
        TransactionCoordinator::shutdown(&db_path);
    }
}
