// Incremental indexer tests: full pipeline runs, diff stability, single-file
// operations, idempotency, and clear.

#[cfg(test)]
mod pipeline {
    use crate::config::IndexConfig;
    use crate::database::{SymbolStore, TransactionCoordinator};
    use crate::ignore::IgnoreController;
    use crate::indexer::{IncrementalIndexer, IndexStatus, diff, scanner};
    use crate::tests::test_utils::{bump_mtime, make_workspace};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    const USER_TS: &str = r#"
export class User {
  name: string;

  getName(): string {
    return this.name;
  }
}
"#;

    const SERVICE_TS: &str = r#"
import { User } from '../models/user';

export function getUserData(userId: string): User {
  return new User();
}
"#;

    fn workspace() -> TempDir {
        make_workspace(&[
            ("src/models/user.ts", USER_TS),
            ("src/services/user-service.ts", SERVICE_TS),
        ])
    }

    fn indexer_for(
        workspace: &TempDir,
    ) -> (TempDir, Arc<Mutex<SymbolStore>>, IncrementalIndexer) {
        let storage = tempfile::tempdir().unwrap();
        let db_path = storage.path().join("ws.db");
        let store = Arc::new(Mutex::new(SymbolStore::open(&db_path).unwrap()));
        let coordinator = TransactionCoordinator::new(store.clone());
        let indexer = IncrementalIndexer::new(
            workspace.path().to_path_buf(),
            IndexConfig::default(),
            coordinator,
        );
        (storage, store, indexer)
    }

    #[tokio::test]
    async fn full_run_populates_the_store() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);

        indexer.start_indexing().await.unwrap();

        let progress = indexer.progress();
        assert_eq!(progress.status, IndexStatus::Completed);
        assert_eq!(progress.total, 2);
        assert_eq!(progress.completed, 2);

        let store = store.lock().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.files_count, 2);
        assert!(stats.symbols_count >= 3); // User, getName, getUserData at least
        assert!(stats.keywords_count > 0);
        assert!(stats.last_indexed.is_some());

        let file = store.get_file_by_path("src/models/user.ts").unwrap();
        assert_eq!(file.language, "typescript");
        // Freshness mirrors the observed mtime.
        assert_eq!(file.content_hash, file.last_modified.to_string());
    }

    #[tokio::test]
    async fn rescan_without_changes_is_an_empty_diff() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);
        indexer.start_indexing().await.unwrap();

        let config = IndexConfig::default();
        let ignore = IgnoreController::new(workspace.path());
        let scanned = scanner::scan_workspace(workspace.path(), &config, &ignore)
            .await
            .unwrap();
        let stored = store.lock().unwrap().all_file_freshness().unwrap();
        let diff = diff::compute_diff(&scanned, &stored);

        assert!(diff.to_update.is_empty());
        assert!(diff.to_delete.is_empty());
    }

    #[tokio::test]
    async fn modified_files_are_reingested_and_deleted_files_pruned() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);
        indexer.start_indexing().await.unwrap();

        // Touch one file forward and delete the other.
        bump_mtime(&workspace.path().join("src/models/user.ts"));
        std::fs::remove_file(workspace.path().join("src/services/user-service.ts")).unwrap();

        indexer.refresh().await.unwrap();

        let store = store.lock().unwrap();
        assert!(store.get_file_by_path("src/services/user-service.ts").is_none());
        assert!(store.get_file_by_path("src/models/user.ts").is_some());
        assert_eq!(store.stats().unwrap().files_count, 1);
    }

    #[tokio::test]
    async fn index_file_is_idempotent() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);

        indexer.index_file("src/models/user.ts").await.unwrap();
        let first = store.lock().unwrap().stats().unwrap();

        indexer.index_file("src/models/user.ts").await.unwrap();
        let second = store.lock().unwrap().stats().unwrap();

        assert_eq!(first.files_count, second.files_count);
        assert_eq!(first.symbols_count, second.symbols_count);
        assert_eq!(first.keywords_count, second.keywords_count);

        // Same symbol set, not just same counts.
        let file = store
            .lock()
            .unwrap()
            .get_file_by_path("src/models/user.ts")
            .unwrap();
        let names: Vec<String> = store
            .lock()
            .unwrap()
            .get_symbols_for_file(file.id)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert!(names.contains(&"User".to_string()));
        assert!(names.contains(&"getName".to_string()));
    }

    #[tokio::test]
    async fn remove_undoes_index_file() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);

        let before = store.lock().unwrap().stats().unwrap().files_count;
        indexer.index_file("src/models/user.ts").await.unwrap();
        indexer.remove_file("src/models/user.ts").await.unwrap();
        let after = store.lock().unwrap().stats().unwrap().files_count;

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn missing_files_surface_not_found() {
        let workspace = workspace();
        let (_storage, _store, indexer) = indexer_for(&workspace);
        let result = indexer.index_file("src/ghost.ts").await;
        assert!(matches!(result, Err(crate::error::IndexError::NotFound { .. })));
    }

    #[tokio::test]
    async fn clear_empties_tables_and_stamps_last_reset() {
        let workspace = workspace();
        let (_storage, store, indexer) = indexer_for(&workspace);
        indexer.start_indexing().await.unwrap();
        assert!(store.lock().unwrap().stats().unwrap().files_count > 0);

        indexer.clear().await.unwrap();

        let store = store.lock().unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.files_count, 0);
        assert_eq!(stats.symbols_count, 0);
        assert_eq!(stats.keywords_count, 0);
        assert_eq!(stats.relations_count, 0);
        let last_reset = store.get_meta("last_reset").expect("last_reset stamped");
        assert!(last_reset.parse::<i64>().unwrap() > 0);
    }

    #[tokio::test]
    async fn plaintext_files_get_rows_but_no_symbols() {
        let workspace = make_workspace(&[("src/notes.xyz", "just some notes\n")]);
        let (_storage, store, indexer) = indexer_for(&workspace);
        indexer.start_indexing().await.unwrap();

        let store = store.lock().unwrap();
        let file = store.get_file_by_path("src/notes.xyz").expect("file row");
        assert_eq!(file.language, "plaintext");
        assert_eq!(store.get_symbols_for_file(file.id).unwrap().len(), 0);
    }

    #[tokio::test]
    async fn relations_link_across_files() {
        let workspace = make_workspace(&[
            (
                "src/shapes.ts",
                "export interface Shape {\n  area(): number;\n}\n",
            ),
            (
                "src/circle.ts",
                "import { Shape } from './shapes';\n\nexport class Circle implements Shape {\n  area(): number { return 3.14; }\n}\n",
            ),
        ]);
        let (_storage, store, indexer) = indexer_for(&workspace);
        indexer.start_indexing().await.unwrap();

        let store = store.lock().unwrap();
        let implementors = store.find_implementor_ids("Shape").unwrap();
        assert_eq!(implementors.len(), 1);
        let circle = store.get_symbol_by_id(implementors[0]).unwrap();
        assert_eq!(circle.name, "Circle");
    }
}
