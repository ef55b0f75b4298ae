// TypeScript / JavaScript import resolution.
//
// Handles `import ... from '...'` and `require('...')`. Only relative paths
// are resolved; bare module specifiers belong to the package manager.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct TypeScriptImports;

const EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx"];

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)import\s+[^;]*?from\s+['"]([^'"]+)['"]|import\s+['"]([^'"]+)['"]|require\(\s*['"]([^'"]+)['"]\s*\)"#)
            .expect("typescript import regex")
    })
}

impl ImportResolver for TypeScriptImports {
    fn get_direct_imports(&self, file: &Path, _workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let Some(dir) = file.parent() else {
            return Vec::new();
        };

        let mut imports = Vec::new();
        for captures in import_re().captures_iter(&source) {
            let specifier = captures
                .get(1)
                .or_else(|| captures.get(2))
                .or_else(|| captures.get(3))
                .map(|m| m.as_str());
            let Some(specifier) = specifier else { continue };
            if !specifier.starts_with('.') {
                continue;
            }
            if let Some(resolved) = resolve_relative(dir, specifier) {
                if !imports.contains(&resolved) {
                    imports.push(resolved);
                }
            }
        }
        imports
    }
}

/// Try the specifier as-is, with each known extension, then as a directory
/// with an index file.
fn resolve_relative(dir: &Path, specifier: &str) -> Option<PathBuf> {
    let base = crate::utils::paths::normalize(&dir.join(specifier));

    if base.is_file() {
        return Some(base);
    }
    for ext in EXTENSIONS {
        let candidate = base.with_extension(ext);
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    for ext in EXTENSIONS {
        let candidate = base.join(format!("index.{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}
