// Kotlin import resolution.
//
// Handles `import a.b.C`, resolved under the nearest Gradle root's
// `src/main/kotlin` or `src/main/java` source sets.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct KotlinImports;

const ROOT_MARKERS: &[&str] = &[
    "build.gradle",
    "build.gradle.kts",
    "settings.gradle",
    "settings.gradle.kts",
];
const SOURCE_ROOTS: &[&str] = &["src/main/kotlin", "src/main/java"];

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*import\s+([\w.]+)").expect("kotlin import regex"))
}

impl ImportResolver for KotlinImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let project_root = super::find_project_root(file, ROOT_MARKERS)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        let mut imports = Vec::new();
        for captures in import_re().captures_iter(&source) {
            let Some(path) = captures.get(1) else { continue };
            let path = path.as_str();
            if path.starts_with("java.") || path.starts_with("kotlin.") {
                continue;
            }
            let relative: PathBuf = path.split('.').collect();
            for source_root in SOURCE_ROOTS {
                let base = project_root.join(source_root).join(&relative);
                let as_kotlin = base.with_extension("kt");
                let as_java = base.with_extension("java");
                let resolved = if as_kotlin.is_file() {
                    Some(as_kotlin)
                } else if as_java.is_file() {
                    Some(as_java)
                } else {
                    None
                };
                if let Some(resolved) = resolved {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_under_gradle_source_sets() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("build.gradle.kts"), "plugins {}\n").unwrap();
        std::fs::create_dir_all(root.join("src/main/kotlin/com/example/models")).unwrap();
        std::fs::write(
            root.join("src/main/kotlin/com/example/models/User.kt"),
            "package com.example.models\n\nclass User\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.join("src/main/kotlin/com/example/app")).unwrap();
        let main = root.join("src/main/kotlin/com/example/app/Main.kt");
        std::fs::write(
            &main,
            "package com.example.app\n\nimport com.example.models.User\nimport kotlin.math.abs\n",
        )
        .unwrap();

        let imports = KotlinImports.get_direct_imports(&main, root);
        assert_eq!(
            imports,
            vec![root.join("src/main/kotlin/com/example/models/User.kt")]
        );
    }
}
