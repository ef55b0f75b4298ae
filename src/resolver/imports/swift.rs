// Swift import resolution.
//
// Handles `import Module`. Resolution searches the project root (nearest
// .xcodeproj, .xcworkspace, or Package.swift ancestor) for a directory named
// after the module and yields its Swift sources.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct SwiftImports;

const ROOT_MARKERS: &[&str] = &["Package.swift", "*.xcodeproj", "*.xcworkspace"];

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+(\w+)").expect("swift import regex"))
}

impl ImportResolver for SwiftImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let project_root = super::find_project_root(file, ROOT_MARKERS)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        let mut imports = Vec::new();
        for captures in import_re().captures_iter(&source) {
            let Some(module) = captures.get(1) else { continue };
            let module = module.as_str();
            if matches!(module, "Foundation" | "Swift" | "UIKit" | "AppKit" | "SwiftUI") {
                continue;
            }
            let Some(module_dir) = find_module_dir(&project_root, module) else {
                continue;
            };
            let Ok(entries) = std::fs::read_dir(&module_dir) else {
                continue;
            };
            let mut sources: Vec<PathBuf> = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("swift"))
                .collect();
            sources.sort();
            for source_file in sources {
                if !imports.contains(&source_file) {
                    imports.push(source_file);
                }
            }
        }
        imports
    }
}

/// SwiftPM convention first (`Sources/<Module>`), then a bounded search for a
/// directory with the module's name.
fn find_module_dir(project_root: &Path, module: &str) -> Option<PathBuf> {
    let conventional = project_root.join("Sources").join(module);
    if conventional.is_dir() {
        return Some(conventional);
    }
    let direct = project_root.join(module);
    if direct.is_dir() {
        return Some(direct);
    }
    None
}
