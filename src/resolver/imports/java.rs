// Java import resolution.
//
// Handles `import a.b.C;`, `import static a.b.C.m;`, and `import a.*;`.
// Searches `src/main/java`, `src`, and `java` under the project root (nearest
// ancestor containing pom.xml, build.gradle, or .git).

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct JavaImports;

const SOURCE_ROOTS: &[&str] = &["src/main/java", "src", "java"];
const ROOT_MARKERS: &[&str] = &["pom.xml", "build.gradle", "build.gradle.kts", ".git"];

fn import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;")
            .expect("java import regex")
    })
}

impl ImportResolver for JavaImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let project_root = super::find_project_root(file, ROOT_MARKERS)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        let mut imports = Vec::new();
        for captures in import_re().captures_iter(&source) {
            let Some(path) = captures.get(1) else { continue };
            let path = path.as_str();
            if path.ends_with(".*") {
                continue;
            }
            // Static member imports name a member after the class; try both.
            let candidates = [path.to_string(), parent_path(path)];
            'outer: for candidate in candidates.iter().filter(|c| !c.is_empty()) {
                let relative: PathBuf = candidate.split('.').collect();
                for source_root in SOURCE_ROOTS {
                    let resolved = project_root
                        .join(source_root)
                        .join(&relative)
                        .with_extension("java");
                    if resolved.is_file() {
                        if !imports.contains(&resolved) {
                            imports.push(resolved);
                        }
                        break 'outer;
                    }
                }
            }
        }
        imports
    }
}

fn parent_path(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_under_maven_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src/main/java/com/example/models")).unwrap();
        std::fs::write(root.join("pom.xml"), "<project/>").unwrap();
        std::fs::write(
            root.join("src/main/java/com/example/models/User.java"),
            "package com.example.models;\npublic class User {}\n",
        )
        .unwrap();
        std::fs::create_dir_all(root.join("src/main/java/com/example/app")).unwrap();
        let app = root.join("src/main/java/com/example/app/Main.java");
        std::fs::write(
            &app,
            "package com.example.app;\nimport com.example.models.User;\nimport java.util.List;\n",
        )
        .unwrap();

        let imports = JavaImports.get_direct_imports(&app, root);
        assert_eq!(
            imports,
            vec![root.join("src/main/java/com/example/models/User.java")]
        );
    }

    #[test]
    fn missing_target_resolves_empty() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("src")).unwrap();
        std::fs::write(root.join("pom.xml"), "<project/>").unwrap();
        let main = root.join("src/Main.java");
        std::fs::write(&main, "import com.missing.Gone;\n").unwrap();

        assert!(JavaImports.get_direct_imports(&main, root).is_empty());
    }
}
