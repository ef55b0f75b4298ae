//! `.coolignore` access control.
//!
//! A `.coolignore` file at the workspace root restricts which paths the host
//! exposes to the indexing core, using standard gitignore syntax. Two checks
//! are exposed: [`IgnoreController::validate_access`] for direct file access
//! and [`IgnoreController::validate_command`] for shell commands that read
//! files (`cat secrets/api.key` is as much of a leak as opening the file).
//!
//! Paths outside the workspace are allowed — the ignore file only has
//! authority over the tree it sits in.

use crate::utils::paths;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name of the ignore file at the workspace root.
pub const IGNORE_FILE_NAME: &str = ".coolignore";

/// Commands whose arguments are file paths that get read.
const FILE_READING_COMMANDS: &[&str] = &[
    "cat", "less", "more", "head", "tail", "grep", "awk", "sed", "cut", "sort", "uniq", "wc",
    "strings", "xxd", "hexdump", "od", "base64",
];

/// Pattern-based access control for a workspace.
pub struct IgnoreController {
    workspace_root: PathBuf,
    matcher: Option<Gitignore>,
}

impl IgnoreController {
    /// Build a controller from the workspace root, loading `.coolignore` if
    /// present. A missing or unreadable ignore file means everything is
    /// allowed.
    pub fn new(workspace_root: &Path) -> Self {
        let ignore_path = workspace_root.join(IGNORE_FILE_NAME);
        let matcher = if ignore_path.is_file() {
            let mut builder = GitignoreBuilder::new(workspace_root);
            match builder.add(&ignore_path) {
                None => match builder.build() {
                    Ok(gitignore) => {
                        debug!(
                            "Loaded {} with {} rules",
                            ignore_path.display(),
                            gitignore.len()
                        );
                        Some(gitignore)
                    }
                    Err(e) => {
                        warn!("Failed to build ignore rules from {}: {}", ignore_path.display(), e);
                        None
                    }
                },
                Some(e) => {
                    warn!("Failed to read {}: {}", ignore_path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        Self {
            workspace_root: workspace_root.to_path_buf(),
            matcher,
        }
    }

    /// Whether any ignore rules are active.
    pub fn has_rules(&self) -> bool {
        self.matcher.is_some()
    }

    /// Whether `path` may be accessed. Paths outside the workspace are always
    /// allowed; inside it, ignore rules decide.
    pub fn validate_access(&self, path: &str) -> bool {
        let Some(matcher) = &self.matcher else {
            return true;
        };

        let candidate = Path::new(path);
        // Outside the workspace (absolute elsewhere, or relative escaping via
        // `..`): the ignore file has no authority there.
        if !paths::is_within(candidate, &self.workspace_root) {
            return true;
        }

        let relative = if candidate.is_absolute() {
            match candidate.strip_prefix(&self.workspace_root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => return true,
            }
        } else {
            paths::normalize(candidate)
        };

        !matcher
            .matched_path_or_any_parents(&relative, false)
            .is_ignore()
    }

    /// Check a shell command for arguments that touch ignored files. Returns
    /// the first offending argument, or None when the command is clean.
    pub fn validate_command(&self, command: &str) -> Option<String> {
        if self.matcher.is_none() {
            return None;
        }

        let mut parts = command.split_whitespace();
        let program = parts.next()?;
        let program_name = Path::new(program)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(program);

        if !FILE_READING_COMMANDS.contains(&program_name) {
            return None;
        }

        for arg in parts {
            // Skip flags and shell operators; anything else is a path candidate.
            if arg.starts_with('-') || matches!(arg, "|" | ">" | ">>" | "<" | "&&" | "||" | ";") {
                continue;
            }
            if !self.validate_access(arg) {
                return Some(arg.to_string());
            }
        }

        None
    }
}
