// PHP require/use resolution.
//
// Handles `require`/`include` (path literals, relative to the file or the
// workspace root) and `use Namespace\...;` resolved by namespace-to-path
// convention under the project root, falling back to a filename search.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct PhpImports;

const ROOT_MARKERS: &[&str] = &["composer.json", ".git"];

fn require_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)(?:require|include)(?:_once)?\s*\(?\s*['"]([^'"]+)['"]"#)
            .expect("php require regex")
    })
}

fn use_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*use\s+([\w\\]+)(?:\s+as\s+\w+)?\s*;").expect("php use regex")
    })
}

impl ImportResolver for PhpImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let file_dir = file.parent();
        let project_root = super::find_project_root(file, ROOT_MARKERS)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        let mut imports = Vec::new();
        let push = |resolved: PathBuf, imports: &mut Vec<PathBuf>| {
            if !imports.contains(&resolved) {
                imports.push(resolved);
            }
        };

        for captures in require_re().captures_iter(&source) {
            let Some(target) = captures.get(1) else { continue };
            let target = Path::new(target.as_str());
            let candidates = file_dir
                .map(|dir| crate::utils::paths::normalize(&dir.join(target)))
                .into_iter()
                .chain(std::iter::once(workspace_root.join(target)));
            if let Some(resolved) = candidates.into_iter().find(|c| c.is_file()) {
                push(resolved, &mut imports);
            }
        }

        for captures in use_re().captures_iter(&source) {
            let Some(namespace) = captures.get(1) else { continue };
            let segments: Vec<&str> = namespace.as_str().split('\\').collect();
            if let Some(resolved) = resolve_namespace(&project_root, &segments) {
                push(resolved, &mut imports);
            }
        }

        imports
    }
}

fn resolve_namespace(project_root: &Path, segments: &[&str]) -> Option<PathBuf> {
    let relative: PathBuf = segments.iter().collect();
    for base in ["", "src", "app", "lib"] {
        let candidate = if base.is_empty() {
            project_root.join(&relative).with_extension("php")
        } else {
            project_root.join(base).join(&relative).with_extension("php")
        };
        if candidate.is_file() {
            return Some(candidate);
        }
    }

    let trailing = segments.last()?;
    let candidates = super::find_files_named(project_root, &format!("{trailing}.php"), 32);
    super::best_namespace_match(candidates, segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_requires_and_uses() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("composer.json"), "{}").unwrap();
        std::fs::create_dir_all(root.join("src/App/Models")).unwrap();
        std::fs::write(root.join("src/App/Models/User.php"), "<?php class User {}\n").unwrap();
        std::fs::write(root.join("src/bootstrap.php"), "<?php\n").unwrap();
        let index = root.join("src/index.php");
        std::fs::write(
            &index,
            "<?php\nrequire_once 'bootstrap.php';\nuse App\\Models\\User;\n",
        )
        .unwrap();

        let imports = PhpImports.get_direct_imports(&index, root);
        assert!(imports.contains(&root.join("src/bootstrap.php")));
        assert!(imports.contains(&root.join("src/App/Models/User.php")));
    }
}
