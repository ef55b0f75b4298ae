// C / C++ include resolution.
//
// Handles `#include "..."` with a local search relative to the including file,
// then `<root>/include`. Angle-bracket includes are system headers and are not
// resolved.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct CFamilyImports;

fn include_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?m)^\s*#\s*include\s+"([^"]+)""#).expect("include regex"))
}

impl ImportResolver for CFamilyImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let file_dir = file.parent();

        let mut imports = Vec::new();
        for captures in include_re().captures_iter(&source) {
            let Some(header) = captures.get(1) else { continue };
            let header = Path::new(header.as_str());

            let local = file_dir.map(|dir| crate::utils::paths::normalize(&dir.join(header)));
            let in_include_dir = workspace_root.join("include").join(header);

            let resolved = local
                .filter(|candidate| candidate.is_file())
                .or_else(|| in_include_dir.is_file().then_some(in_include_dir));

            if let Some(resolved) = resolved {
                if !imports.contains(&resolved) {
                    imports.push(resolved);
                }
            }
        }
        imports
    }
}
