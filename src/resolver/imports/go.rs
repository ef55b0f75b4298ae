// Go import resolution.
//
// Handles single `import "..."` lines and `import ( ... )` blocks. Import
// paths name packages; resolution yields the package directory's .go files.
// Search order: the nearest ancestor containing go.mod (module-relative),
// then $GOPATH/src, then vendor/.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct GoImports;

fn single_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*import\s+(?:\w+\s+)?"([^"]+)""#).expect("go import"))
}

fn block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)import\s*\(\s*(.*?)\s*\)").expect("go import block"))
}

fn block_entry_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*(?:\w+\s+|\.\s+|_\s+)?"([^"]+)""#).expect("go entry"))
}

impl ImportResolver for GoImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);

        let mut paths: Vec<String> = Vec::new();
        for captures in single_import_re().captures_iter(&source) {
            if let Some(path) = captures.get(1) {
                paths.push(path.as_str().to_string());
            }
        }
        for block in block_re().captures_iter(&source) {
            let Some(body) = block.get(1) else { continue };
            for entry in block_entry_re().captures_iter(body.as_str()) {
                if let Some(path) = entry.get(1) {
                    paths.push(path.as_str().to_string());
                }
            }
        }
        paths.dedup();

        let module_root = super::find_project_root(file, &["go.mod"]);
        let module_name = module_root.as_deref().and_then(read_module_name);

        let mut imports = Vec::new();
        for import_path in &paths {
            let Some(package_dir) =
                resolve_package_dir(import_path, module_root.as_deref(), module_name.as_deref(), workspace_root)
            else {
                continue;
            };
            for go_file in package_sources(&package_dir) {
                if !imports.contains(&go_file) {
                    imports.push(go_file);
                }
            }
        }
        imports
    }
}

fn read_module_name(module_root: &Path) -> Option<String> {
    let content = std::fs::read_to_string(module_root.join("go.mod")).ok()?;
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix("module ")
            .map(|name| name.trim().to_string())
    })
}

fn resolve_package_dir(
    import_path: &str,
    module_root: Option<&Path>,
    module_name: Option<&str>,
    workspace_root: &Path,
) -> Option<PathBuf> {
    // Module-relative first.
    if let (Some(root), Some(module)) = (module_root, module_name) {
        if let Some(rest) = import_path.strip_prefix(module) {
            let rest = rest.trim_start_matches('/');
            let dir = if rest.is_empty() {
                root.to_path_buf()
            } else {
                root.join(rest)
            };
            if dir.is_dir() {
                return Some(dir);
            }
        }
    }

    // Then $GOPATH/src.
    if let Ok(gopath) = std::env::var("GOPATH") {
        let dir = Path::new(&gopath).join("src").join(import_path);
        if dir.is_dir() {
            return Some(dir);
        }
    }

    // Then vendor/.
    let vendor_base = module_root.unwrap_or(workspace_root);
    let dir = vendor_base.join("vendor").join(import_path);
    if dir.is_dir() {
        return Some(dir);
    }

    None
}

fn package_sources(package_dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(package_dir) else {
        return Vec::new();
    };
    let mut sources: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("go")
                && !path
                    .file_name()
                    .map(|n| n.to_string_lossy().ends_with("_test.go"))
                    .unwrap_or(false)
        })
        .collect();
    sources.sort();
    sources
}
