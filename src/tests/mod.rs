// Test suite for the indexing core.

pub mod coordinator_tests;
pub mod extractor_tests;
pub mod indexer_tests;
pub mod search_tests;

pub mod test_utils {
    use crate::config::IndexConfig;
    use crate::manager::CodeIndexManager;
    use std::path::Path;
    use tempfile::TempDir;

    /// Build a throwaway workspace from `(relative path, content)` pairs.
    pub fn make_workspace(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().expect("create temp workspace");
        for (relative, content) in files {
            let path = dir.path().join(relative);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent dirs");
            }
            std::fs::write(&path, content).expect("write fixture file");
        }
        dir
    }

    /// A manager over a fresh workspace and storage directory.
    pub fn make_manager(files: &[(&str, &str)]) -> (TempDir, TempDir, CodeIndexManager) {
        let workspace = make_workspace(files);
        let storage = tempfile::tempdir().expect("create temp storage");
        let manager = CodeIndexManager::initialize(
            workspace.path(),
            storage.path(),
            IndexConfig::default(),
        )
        .expect("initialize manager");
        (workspace, storage, manager)
    }

    /// Touch a file's mtime forward so the diff sees it as stale.
    pub fn bump_mtime(path: &Path) {
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        let file = std::fs::File::options()
            .write(true)
            .open(path)
            .expect("open for mtime bump");
        file.set_modified(later).expect("set mtime");
    }
}
