// Query engine tests: the end-to-end search scenarios, option filtering,
// ranking, and find_implementations.

#[cfg(test)]
mod search_scenarios {
    use crate::search::SearchOptions;
    use crate::tests::test_utils::make_manager;

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

    const AUTH_TS: &str = r#"
export class AuthenticationService {
  login(username: string, password: string): boolean {
    return username.length > 0 && password.length > 0;
  }
}
"#;

    fn fixture() -> &'static [(&'static str, &'static str)] {
        &[
            ("src/models/user.ts", USER_TS),
            ("src/services/user-service.ts", SERVICE_TS),
            ("src/services/auth-service.ts", AUTH_TS),
        ]
    }

    #[tokio::test]
    async fn user_class_query_finds_the_class() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let results = manager
            .search("user class", &SearchOptions::default())
            .unwrap();
        assert!(!results.is_empty());
        let top = &results[0];
        assert_eq!(top.symbol.as_deref(), Some("User"));
        assert_eq!(top.symbol_type, "class");
        assert_eq!(top.file, "src/models/user.ts");
        assert!(top.relevance > 0.0 && top.relevance <= 1.0);
    }

    #[tokio::test]
    async fn authentication_login_query_finds_class_and_method() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let results = manager
            .search("authentication login", &SearchOptions::default())
            .unwrap();
        assert!(results.len() >= 2);

        let symbols: Vec<&str> = results
            .iter()
            .filter_map(|r| r.symbol.as_deref())
            .collect();
        assert!(symbols.contains(&"AuthenticationService"));
        assert!(symbols.contains(&"login"));

        let class = results
            .iter()
            .find(|r| r.symbol.as_deref() == Some("AuthenticationService"))
            .unwrap();
        assert_eq!(class.symbol_type, "class");
        let method = results
            .iter()
            .find(|r| r.symbol.as_deref() == Some("login"))
            .unwrap();
        assert_eq!(method.symbol_type, "method");
    }

    #[tokio::test]
    async fn quoted_query_ranks_the_exact_symbol_first() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let results = manager
            .search("\"getUserData\"", &SearchOptions::default())
            .unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].symbol.as_deref(), Some("getUserData"));
    }

    #[tokio::test]
    async fn empty_queries_fail_with_invalid_argument() {
        let (_ws, _st, manager) = make_manager(fixture());
        let err = manager.search("   ", &SearchOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            crate::error::IndexError::InvalidArgument { .. }
        ));
    }

    #[tokio::test]
    async fn language_and_directory_filters_apply() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let mut options = SearchOptions::default();
        options.language = Some("python".to_string());
        assert!(manager.search("user", &options).unwrap().is_empty());

        let mut options = SearchOptions::default();
        options.target_directories = vec!["src/services".to_string()];
        let results = manager.search("user", &options).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.file.starts_with("src/services")));
    }

    #[tokio::test]
    async fn scope_and_context_options_apply() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let mut options = SearchOptions::default();
        options.scope = Some("src/models".to_string());
        let results = manager.search("user", &options).unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.file.starts_with("src/models")));

        // Context tokens join the search terms.
        let mut options = SearchOptions::default();
        options.context = Some("login flow".to_string());
        let with_context = manager.search("service", &options).unwrap();
        assert!(
            with_context
                .iter()
                .any(|r| r.symbol.as_deref() == Some("login"))
        );
    }

    #[tokio::test]
    async fn max_results_truncates() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let mut options = SearchOptions::default();
        options.max_results = Some(1);
        let results = manager.search("user", &options).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn context_carries_the_definition_line() {
        let (_ws, _st, manager) = make_manager(fixture());
        manager.start_indexing().await.unwrap();

        let results = manager
            .search("\"getUserData\"", &SearchOptions::default())
            .unwrap();
        assert!(results[0].context.contains("getUserData"));
        assert!(results[0].line >= 1);
    }
}

#[cfg(test)]
mod implementations {
    use crate::tests::test_utils::make_manager;

    #[tokio::test]
    async fn find_implementations_follows_relation_edges() {
        let files: &[(&str, &str)] = &[
            (
                "src/shapes.ts",
                "export interface Shape {\n  area(): number;\n}\n",
            ),
            (
                "src/circle.ts",
                "import { Shape } from './shapes';\n\nexport class Circle implements Shape {\n  area(): number { return 3.14; }\n}\n",
            ),
            (
                "src/square.ts",
                "import { Shape } from './shapes';\n\nexport class Square implements Shape {\n  area(): number { return 1.0; }\n}\n",
            ),
        ];
        let (_ws, _st, manager) = make_manager(files);
        manager.start_indexing().await.unwrap();

        let implementations = manager.find_implementations("Shape").unwrap();
        let names: Vec<&str> = implementations
            .iter()
            .filter_map(|r| r.symbol.as_deref())
            .collect();
        assert_eq!(names, vec!["Circle", "Square"]);

        assert!(manager.find_implementations("").is_err());
        assert!(manager.find_implementations("Nothing").unwrap().is_empty());
    }
}

#[cfg(test)]
mod manager_surface {
    use crate::indexer::IndexStatus;
    use crate::tests::test_utils::make_manager;
    use crate::utils::identity;

    #[tokio::test]
    async fn stats_track_the_store() {
        let (_ws, _st, manager) =
            make_manager(&[("src/a.ts", "export class Alpha {}\n")]);

        let empty = manager.get_index_stats().unwrap();
        assert_eq!(empty.files_count, 0);
        assert_eq!(empty.status, IndexStatus::Idle);

        manager.start_indexing().await.unwrap();

        let stats = manager.get_index_stats().unwrap();
        assert_eq!(stats.files_count, 1);
        assert!(stats.symbols_count >= 1);
        assert!(stats.last_indexed.is_some());
        assert_eq!(stats.status, IndexStatus::Completed);

        let progress = manager.get_progress();
        assert_eq!(progress.completed, progress.total);
    }

    #[tokio::test]
    async fn clear_resets_counts() {
        let (_ws, _st, manager) =
            make_manager(&[("src/a.ts", "export class Alpha {}\n")]);
        manager.start_indexing().await.unwrap();
        manager.clear_index().await.unwrap();

        let stats = manager.get_index_stats().unwrap();
        assert_eq!(stats.files_count, 0);
        assert_eq!(stats.symbols_count, 0);
        assert_eq!(stats.keywords_count, 0);
        assert_eq!(stats.status, IndexStatus::Idle);
    }

    #[test]
    fn workspace_ids_are_stable_and_distinct() {
        let a = identity::workspace_id("/home/dev/project-a");
        let b = identity::workspace_id("/home/dev/project-b");
        assert_eq!(a, identity::workspace_id("/home/dev/project-a"));
        assert_ne!(a, b);
    }

    #[test]
    fn database_lands_under_the_storage_subdir() {
        let (_ws, storage, manager) = make_manager(&[]);
        let db_path = manager.db_path().to_path_buf();
        assert!(db_path.starts_with(storage.path().join("workspace_indexing")));
        assert!(
            db_path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .ends_with(".db")
        );
        let marker = crate::database::SymbolStore::version_marker_path(&db_path);
        assert!(marker.exists());
        manager.shutdown().unwrap();
    }
}
