//! Path normalization helpers.
//!
//! Every path stored in the index is relative to the workspace root and uses
//! forward slashes, regardless of platform. Matching against store rows is
//! string equality, so normalization has to be applied at every boundary.

use std::path::{Component, Path, PathBuf};

/// Convert a path to a POSIX-style string (forward slashes).
pub fn to_posix_string(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => out.push('/'),
            Component::Prefix(prefix) => out.push_str(&prefix.as_os_str().to_string_lossy()),
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str("..");
            }
            Component::Normal(segment) => {
                if !out.is_empty() && !out.ends_with('/') {
                    out.push('/');
                }
                out.push_str(&segment.to_string_lossy());
            }
        }
    }
    out
}

/// Make `path` relative to `root` and POSIX-style. Paths outside the root are
/// returned absolute (still POSIX-style) so callers can detect them.
pub fn to_relative_posix(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) => to_posix_string(relative),
        Err(_) => to_posix_string(path),
    }
}

/// Resolve `.` and `..` segments without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `path` is inside `root` after lexical normalization.
pub fn is_within(path: &Path, root: &Path) -> bool {
    let normalized = if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&root.join(path))
    };
    normalized.starts_with(normalize(root))
}
