// Ruby require resolution.
//
// Handles `require`, `require_relative`, `load`, and `autoload`. Relative
// requires resolve against the requiring file; plain requires try the project
// lib/ and app/ conventions, then the workspace root.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct RubyImports;

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?m)^\s*(require_relative|require|load)\s+['"]([^'"]+)['"]|^\s*autoload\s+:\w+\s*,\s*['"]([^'"]+)['"]"#,
        )
        .expect("ruby require regex")
    })
}

impl ImportResolver for RubyImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let file_dir = file.parent();

        let mut imports = Vec::new();
        for captures in require_re().captures_iter(&source) {
            let keyword = captures.get(1).map(|m| m.as_str()).unwrap_or("autoload");
            let Some(target) = captures.get(2).or_else(|| captures.get(3)) else {
                continue;
            };
            let target = target.as_str();

            let resolved = if keyword == "require_relative" {
                file_dir.and_then(|dir| probe_rb(&dir.join(target)))
            } else {
                ["lib", "app", ""]
                    .iter()
                    .find_map(|base| {
                        let candidate = if base.is_empty() {
                            workspace_root.join(target)
                        } else {
                            workspace_root.join(base).join(target)
                        };
                        probe_rb(&candidate)
                    })
                    .or_else(|| file_dir.and_then(|dir| probe_rb(&dir.join(target))))
            };

            if let Some(resolved) = resolved {
                if !imports.contains(&resolved) {
                    imports.push(resolved);
                }
            }
        }
        imports
    }
}

fn probe_rb(candidate: &Path) -> Option<PathBuf> {
    let normalized = crate::utils::paths::normalize(candidate);
    if normalized.extension().is_some() && normalized.is_file() {
        return Some(normalized);
    }
    let with_ext = normalized.with_extension("rb");
    if with_ext.is_file() {
        return Some(with_ext);
    }
    None
}
