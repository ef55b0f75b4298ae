// Python import resolution.
//
// Handles `import a.b` and `from a.b import c`, resolving to a `.py` sibling
// or a package's `__init__.py`.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct PythonImports;

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:from\s+([\w.]+)\s+import|import\s+([\w.]+))")
            .expect("python import regex")
    })
}

impl ImportResolver for PythonImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let file_dir = file.parent();

        let mut imports = Vec::new();
        for captures in import_re().captures_iter(&source) {
            let module = captures
                .get(1)
                .or_else(|| captures.get(2))
                .map(|m| m.as_str());
            let Some(module) = module else { continue };

            let relative: PathBuf = module.trim_start_matches('.').split('.').collect();
            let bases = file_dir.into_iter().chain(std::iter::once(workspace_root));
            for base in bases {
                if let Some(resolved) = resolve_module(base, &relative) {
                    if !imports.contains(&resolved) {
                        imports.push(resolved);
                    }
                    break;
                }
            }
        }
        imports
    }
}

fn resolve_module(base: &Path, relative: &Path) -> Option<PathBuf> {
    let as_file = base.join(relative).with_extension("py");
    if as_file.is_file() {
        return Some(as_file);
    }
    let as_package = base.join(relative).join("__init__.py");
    if as_package.is_file() {
        return Some(as_package);
    }
    None
}
