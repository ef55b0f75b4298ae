// Workspace scan
//
// Iterative breadth-first walk over a queue of directories, yielding to the
// scheduler every few directories so the host stays responsive. Errors never
// propagate past a single directory.

use crate::config::IndexConfig;
use crate::error::Result;
use crate::ignore::IgnoreController;
use crate::utils::paths;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Directories never scanned, regardless of configuration.
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    ".svn",
    ".hg",
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    "vendor",
    "__pycache__",
    ".venv",
    "venv",
    ".idea",
    ".vscode",
    "coverage",
    ".nyc_output",
    "docs",
    "examples",
    "tmp",
    "temp",
    ".cache",
    "logs",
];

/// Path segments that mark test code, filtered when `include_tests = false`.
const TEST_SEGMENTS: &[&str] = &[
    "test",
    "tests",
    "spec",
    "coverage",
    "__tests__",
    "__test__",
    "__mocks__",
];

/// Binary and media extensions that are never source code.
const EXCLUDED_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "svg", "webp", "mp3", "mp4", "avi", "mov", "wav",
    "flac", "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "jar", "war", "class", "exe", "dll",
    "so", "dylib", "a", "o", "lib", "pdb", "dat", "db", "sqlite", "pdf", "doc", "docx", "xls",
    "xlsx", "ppt", "pptx", "woff", "woff2", "ttf", "eot", "otf", "lock", "min",
];

/// A file discovered by the scan.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub absolute: PathBuf,
    /// POSIX-style path relative to the workspace root; the store key.
    pub relative: String,
    /// Filesystem mtime in ms since epoch.
    pub last_modified: i64,
}

/// How often control is yielded back to the scheduler during the walk.
const YIELD_EVERY_DIRS: usize = 10;

/// Enumerate eligible files under the workspace, keyed by relative path.
///
/// Starts from the configured include directories, falling back to the
/// workspace root when none exist.
pub async fn scan_workspace(
    root: &Path,
    config: &IndexConfig,
    ignore: &IgnoreController,
) -> Result<HashMap<String, ScannedFile>> {
    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    for dir in &config.include_dirs {
        let candidate = root.join(dir);
        if candidate.is_dir() {
            queue.push_back(candidate);
        }
    }
    if queue.is_empty() {
        queue.push_back(root.to_path_buf());
    }

    let excluded_dirs: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(config.excluded_dirs.iter().map(String::as_str))
        .collect();
    let excluded_exts: HashSet<&str> = EXCLUDED_EXTENSIONS
        .iter()
        .copied()
        .chain(config.excluded_extensions.iter().map(String::as_str))
        .collect();

    let mut files: HashMap<String, ScannedFile> = HashMap::new();
    let mut visited_dirs = 0usize;

    while let Some(dir) = queue.pop_front() {
        visited_dirs += 1;
        if visited_dirs % YIELD_EVERY_DIRS == 0 {
            tokio::task::yield_now().await;
        }

        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if file_type.is_dir() {
                if excluded_dirs.contains(name.as_ref()) {
                    continue;
                }
                if !config.include_tests && TEST_SEGMENTS.contains(&name.as_ref()) {
                    continue;
                }
                queue.push_back(path);
                continue;
            }
            if !file_type.is_file() {
                continue;
            }

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase())
                .unwrap_or_default();
            if excluded_exts.contains(ext.as_str()) {
                continue;
            }

            let relative = paths::to_relative_posix(&path, root);
            if !config.include_tests && has_test_segment(&relative) {
                continue;
            }
            if !ignore.validate_access(&relative) {
                debug!("Ignored by .coolignore: {}", relative);
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!("Cannot stat {}: {}", path.display(), e);
                    continue;
                }
            };
            if metadata.len() > config.max_file_size {
                debug!(
                    "Skipping oversized file {} ({} bytes)",
                    relative,
                    metadata.len()
                );
                continue;
            }

            let last_modified = mtime_ms(&metadata);
            files.insert(
                relative.clone(),
                ScannedFile {
                    absolute: path,
                    relative,
                    last_modified,
                },
            );
        }
    }

    debug!(
        "Scan found {} files across {} directories",
        files.len(),
        visited_dirs
    );
    Ok(files)
}

/// Whether any segment of a relative path is a recognized test directory.
pub fn has_test_segment(relative: &str) -> bool {
    relative
        .split('/')
        .any(|segment| TEST_SEGMENTS.contains(&segment))
}

/// Modification time in ms since epoch; zero when unavailable.
pub fn mtime_ms(metadata: &std::fs::Metadata) -> i64 {
    metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_are_recognized() {
        assert!(has_test_segment("src/__tests__/user.test.ts"));
        assert!(has_test_segment("tests/integration.rs"));
        assert!(has_test_segment("spec/user_spec.rb"));
        assert!(!has_test_segment("src/services/user.ts"));
        // Substrings do not count, only whole segments.
        assert!(!has_test_segment("src/contest/entry.ts"));
    }

    #[tokio::test]
    async fn scan_prefers_include_dirs_and_skips_excluded() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        std::fs::create_dir_all(root.join("tests")).unwrap();
        std::fs::write(root.join("src/main.ts"), "export const a = 1;\n").unwrap();
        std::fs::write(root.join("node_modules/pkg/index.js"), "x").unwrap();
        std::fs::write(root.join("tests/main.test.ts"), "x").unwrap();
        std::fs::write(root.join("stray.ts"), "x").unwrap();

        let config = IndexConfig::default();
        let ignore = IgnoreController::new(root);
        let files = scan_workspace(root, &config, &ignore).await.unwrap();

        // Only the include dir is scanned, so the stray root file is absent.
        assert!(files.contains_key("src/main.ts"));
        assert!(!files.contains_key("stray.ts"));
        assert!(!files.contains_key("node_modules/pkg/index.js"));
        assert!(!files.contains_key("tests/main.test.ts"));
    }

    #[tokio::test]
    async fn scan_falls_back_to_root_without_include_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("main.go"), "package main\n").unwrap();

        let config = IndexConfig::default();
        let ignore = IgnoreController::new(root);
        let files = scan_workspace(root, &config, &ignore).await.unwrap();
        assert!(files.contains_key("main.go"));
    }

    #[tokio::test]
    async fn include_tests_keeps_test_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/__tests__")).unwrap();
        std::fs::write(root.join("src/__tests__/user.test.ts"), "x").unwrap();

        let mut config = IndexConfig::default();
        let ignore = IgnoreController::new(root);
        let without = scan_workspace(root, &config, &ignore).await.unwrap();
        assert!(without.is_empty());

        config.include_tests = true;
        let with = scan_workspace(root, &config, &ignore).await.unwrap();
        assert!(with.contains_key("src/__tests__/user.test.ts"));
    }
}
