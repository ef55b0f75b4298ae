// Path Relevance Factor for Search Quality Enhancement
//
// Boosts production code over dependency, documentation, and test paths when
// ranking search results. The prior is a multiplier folded into the final
// relevance score by the query engine.

use std::path::Path;

/// Path relevance scorer for search result quality enhancement
pub struct PathRelevanceScorer {
    /// Whether the search query contains "test" keyword
    search_contains_test: bool,
}

impl PathRelevanceScorer {
    pub fn new(search_query: &str) -> Self {
        Self {
            search_contains_test: search_query.to_lowercase().contains("test"),
        }
    }

    /// Calculate relevance multiplier for a file path (higher = more relevant).
    pub fn calculate_score(&self, file_path: &str) -> f32 {
        let path = Path::new(file_path);
        let mut score = self.get_directory_score(path);

        if self.is_test_path(path) && !self.search_contains_test {
            score *= 0.5;
        }

        score
    }

    /// Directory-class prior: core source > general > dependencies/docs/tests.
    pub fn get_directory_score(&self, path: &Path) -> f32 {
        let path_str = path.to_string_lossy().to_lowercase();

        if path_str.contains("node_modules") || path_str.contains("vendor") {
            return 0.1;
        }

        if path_str.contains("docs") || path_str.contains("documentation") {
            return 0.2;
        }

        // Production source directories win before test filename patterns are
        // even considered.
        if path_str.starts_with("src/")
            || path_str.contains("/src/")
            || path_str.starts_with("lib/")
            || path_str.contains("/lib/")
            || path_str.starts_with("app/")
            || path_str.contains("/app/")
            || path_str.starts_with("core/")
            || path_str.contains("/core/")
        {
            return 1.0;
        }

        if path_str.contains("test") || path_str.contains("spec") || path_str.contains("__tests__")
        {
            return 0.4;
        }

        0.7
    }

    /// Check if a path looks like test code
    pub fn is_test_path(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().to_lowercase();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
            .to_lowercase();

        path_str.contains("/test/")
            || path_str.contains("/tests/")
            || path_str.contains("/spec/")
            || path_str.contains("__tests__")
            || path_str.starts_with("test/")
            || path_str.starts_with("tests/")
            || file_name.ends_with("_test.rs")
            || file_name.ends_with(".test.js")
            || file_name.ends_with(".test.ts")
            || file_name.ends_with(".spec.js")
            || file_name.ends_with(".spec.ts")
            || file_name.starts_with("test_")
    }
}
