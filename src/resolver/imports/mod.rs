// Import resolvers
//
// Per language, extract the set of files directly imported by a given file.
// Resolution is textual and best-effort: when no project root can be located
// (missing go.mod, Cargo.toml, pom.xml, ...) a resolver returns empty rather
// than guess. Failures log at debug level and return empty.

mod cfamily;
mod csharp;
mod go;
mod java;
mod kotlin;
mod php;
mod python;
mod ruby;
mod rust;
mod swift;
mod typescript;

use crate::parsing::Language;
use std::path::{Path, PathBuf};

/// Extracts the files directly imported by `file`.
pub trait ImportResolver: Send + Sync {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf>;
}

/// Resolver for a language's import syntax, if the language has one.
pub fn resolver_for(language: Language) -> Option<&'static dyn ImportResolver> {
    static TYPESCRIPT: typescript::TypeScriptImports = typescript::TypeScriptImports;
    static PYTHON: python::PythonImports = python::PythonImports;
    static JAVA: java::JavaImports = java::JavaImports;
    static CSHARP: csharp::CSharpImports = csharp::CSharpImports;
    static CFAMILY: cfamily::CFamilyImports = cfamily::CFamilyImports;
    static GO: go::GoImports = go::GoImports;
    static RUBY: ruby::RubyImports = ruby::RubyImports;
    static PHP: php::PhpImports = php::PhpImports;
    static RUST: rust::RustImports = rust::RustImports;
    static SWIFT: swift::SwiftImports = swift::SwiftImports;
    static KOTLIN: kotlin::KotlinImports = kotlin::KotlinImports;

    Some(match language {
        Language::TypeScript | Language::Tsx | Language::JavaScript => &TYPESCRIPT,
        Language::Python => &PYTHON,
        Language::Java => &JAVA,
        Language::CSharp => &CSHARP,
        Language::C | Language::Cpp => &CFAMILY,
        Language::Go => &GO,
        Language::Ruby => &RUBY,
        Language::Php => &PHP,
        Language::Rust => &RUST,
        Language::Swift => &SWIFT,
        Language::Kotlin => &KOTLIN,
        Language::Plaintext => return None,
    })
}

/// Direct imports of a file, dispatched on its language.
pub fn direct_imports(file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
    match resolver_for(Language::from_path(file)) {
        Some(resolver) => resolver.get_direct_imports(file, workspace_root),
        None => Vec::new(),
    }
}

/// Read a file for import scanning; empty on failure (logged).
pub(crate) fn read_source(file: &Path) -> String {
    match std::fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!("Cannot read {} for import scan: {}", file.display(), e);
            String::new()
        }
    }
}

/// Walk up from `start` looking for a directory containing any of `markers`.
/// Marker entries ending in `*` match by extension suffix (`*.csproj`).
pub(crate) fn find_project_root(start: &Path, markers: &[&str]) -> Option<PathBuf> {
    let mut current = if start.is_dir() {
        Some(start)
    } else {
        start.parent()
    };
    while let Some(dir) = current {
        for marker in markers {
            if let Some(suffix) = marker.strip_prefix('*') {
                let found = std::fs::read_dir(dir)
                    .ok()?
                    .flatten()
                    .any(|entry| entry.file_name().to_string_lossy().ends_with(suffix));
                if found {
                    return Some(dir.to_path_buf());
                }
            } else if dir.join(marker).exists() {
                return Some(dir.to_path_buf());
            }
        }
        current = dir.parent();
    }
    None
}

/// Recursively collect files named `file_name` under `root`, bounded to keep
/// pathological trees cheap.
pub(crate) fn find_files_named(root: &Path, file_name: &str, limit: usize) -> Vec<PathBuf> {
    let mut found = Vec::new();
    let mut queue = std::collections::VecDeque::from([root.to_path_buf()]);
    let mut visited_dirs = 0usize;

    while let Some(dir) = queue.pop_front() {
        visited_dirs += 1;
        if visited_dirs > 2_000 || found.len() >= limit {
            break;
        }
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                let name = entry.file_name();
                let name = name.to_string_lossy();
                if name == ".git" || name == "node_modules" || name == "target" {
                    continue;
                }
                queue.push_back(path);
            } else if entry.file_name().to_string_lossy() == file_name {
                found.push(path);
            }
        }
    }
    found
}

/// Pick the candidate whose path segments overlap the namespace most.
pub(crate) fn best_namespace_match(
    candidates: Vec<PathBuf>,
    namespace_segments: &[&str],
) -> Option<PathBuf> {
    candidates.into_iter().max_by_key(|path| {
        let path_str = path.to_string_lossy().to_lowercase();
        namespace_segments
            .iter()
            .filter(|segment| path_str.contains(&segment.to_lowercase()))
            .count()
    })
}
