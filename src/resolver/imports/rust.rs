// Rust use/mod resolution.
//
// Handles `use path::...;`, `mod name;`, and `extern crate name;`. Module
// declarations resolve to `name.rs` or `name/mod.rs` next to the declaring
// file; `crate::...` paths resolve against the src/ directory of the nearest
// Cargo.toml. External crates are not resolved.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct RustImports;

fn use_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*(?:pub\s+)?use\s+([\w:]+)").expect("rust use regex"))
}

fn mod_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:pub\s+)?mod\s+(\w+)\s*;").expect("rust mod regex")
    })
}

impl ImportResolver for RustImports {
    fn get_direct_imports(&self, file: &Path, _workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let file_dir = file.parent();

        let mut imports = Vec::new();
        let push = |resolved: PathBuf, imports: &mut Vec<PathBuf>| {
            if !imports.contains(&resolved) {
                imports.push(resolved);
            }
        };

        // `mod name;` declarations.
        for captures in mod_re().captures_iter(&source) {
            let Some(name) = captures.get(1) else { continue };
            let Some(dir) = file_dir else { continue };
            let as_file = dir.join(format!("{}.rs", name.as_str()));
            let as_dir = dir.join(name.as_str()).join("mod.rs");
            if as_file.is_file() {
                push(as_file, &mut imports);
            } else if as_dir.is_file() {
                push(as_dir, &mut imports);
            }
        }

        // `use crate::...` paths against the nearest Cargo.toml.
        let cargo_root = super::find_project_root(file, &["Cargo.toml"]);
        for captures in use_re().captures_iter(&source) {
            let Some(path) = captures.get(1) else { continue };
            let Some(rest) = path.as_str().strip_prefix("crate::") else {
                continue;
            };
            let Some(root) = cargo_root.as_deref() else {
                continue;
            };
            let segments: Vec<&str> = rest.split("::").filter(|s| !s.is_empty()).collect();
            if let Some(resolved) = resolve_crate_path(&root.join("src"), &segments) {
                push(resolved, &mut imports);
            }
        }

        imports
    }
}

/// Try the full segment path as a module, then progressively drop trailing
/// segments (they may name items rather than modules).
fn resolve_crate_path(src_root: &Path, segments: &[&str]) -> Option<PathBuf> {
    for take in (1..=segments.len()).rev() {
        let relative: PathBuf = segments[..take].iter().collect();
        let as_file = src_root.join(&relative).with_extension("rs");
        if as_file.is_file() {
            return Some(as_file);
        }
        let as_mod = src_root.join(&relative).join("mod.rs");
        if as_mod.is_file() {
            return Some(as_mod);
        }
    }
    None
}
