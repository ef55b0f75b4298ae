// C# using-directive resolution.
//
// Handles `using X;`, `using static X;`, and `using Alias = X;`. Searches the
// project root (nearest .csproj/.sln directory) by namespace-to-path
// convention, then falls back to a filename search for the trailing
// identifier, picking the candidate whose path overlaps the namespace most.

use super::ImportResolver;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub struct CSharpImports;

const ROOT_MARKERS: &[&str] = &["*.csproj", "*.sln"];

fn using_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*using\s+(?:static\s+)?(?:\w+\s*=\s*)?([\w.]+)\s*;")
            .expect("csharp using regex")
    })
}

impl ImportResolver for CSharpImports {
    fn get_direct_imports(&self, file: &Path, workspace_root: &Path) -> Vec<PathBuf> {
        let source = super::read_source(file);
        let project_root = super::find_project_root(file, ROOT_MARKERS)
            .unwrap_or_else(|| workspace_root.to_path_buf());

        let mut imports = Vec::new();
        for captures in using_re().captures_iter(&source) {
            let Some(namespace) = captures.get(1) else {
                continue;
            };
            let namespace = namespace.as_str();
            if namespace.starts_with("System") {
                continue;
            }
            if let Some(resolved) = resolve_namespace(&project_root, namespace) {
                if !imports.contains(&resolved) {
                    imports.push(resolved);
                }
            }
        }
        imports
    }
}

fn resolve_namespace(project_root: &Path, namespace: &str) -> Option<PathBuf> {
    let segments: Vec<&str> = namespace.split('.').collect();

    // Namespace-to-path convention first.
    let relative: PathBuf = segments.iter().collect();
    let by_convention = project_root.join(&relative).with_extension("cs");
    if by_convention.is_file() {
        return Some(by_convention);
    }

    // Fall back to a filename search for the trailing identifier.
    let trailing = segments.last()?;
    let candidates = super::find_files_named(project_root, &format!("{trailing}.cs"), 32);
    super::best_namespace_match(candidates, &segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_candidate_with_most_namespace_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("App.csproj"), "<Project/>").unwrap();
        std::fs::create_dir_all(root.join("Services/Auth")).unwrap();
        std::fs::create_dir_all(root.join("Legacy")).unwrap();
        std::fs::write(root.join("Services/Auth/Login.cs"), "class Login {}\n").unwrap();
        std::fs::write(root.join("Legacy/Login.cs"), "class Login {}\n").unwrap();
        let program = root.join("Program.cs");
        std::fs::write(&program, "using Services.Auth.Login;\nusing System.Text;\n").unwrap();

        let imports = CSharpImports.get_direct_imports(&program, root);
        assert_eq!(imports, vec![root.join("Services/Auth/Login.cs")]);
    }
}
