// Diff between the scanned workspace and the store.
//
// The `content_hash` column carries a freshness timestamp; a file is stale
// when its scanned mtime is newer than that value. Unparseable freshness
// values are treated as stale so recovery is always re-ingestion.

use super::scanner::ScannedFile;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct WorkspaceDiff {
    /// Store paths no longer present on disk.
    pub to_delete: Vec<String>,
    /// Scanned paths that are new or stale, in scan order.
    pub to_update: Vec<ScannedFile>,
}

pub fn compute_diff(
    scanned: &HashMap<String, ScannedFile>,
    stored: &HashMap<String, String>,
) -> WorkspaceDiff {
    let mut diff = WorkspaceDiff::default();

    for path in stored.keys() {
        if !scanned.contains_key(path) {
            diff.to_delete.push(path.clone());
        }
    }
    diff.to_delete.sort();

    for (path, file) in scanned {
        let stale = match stored.get(path) {
            None => true,
            Some(freshness) => match freshness.parse::<i64>() {
                Ok(freshness) => file.last_modified > freshness,
                Err(_) => true,
            },
        };
        if stale {
            diff.to_update.push(file.clone());
        }
    }
    diff.to_update.sort_by(|a, b| a.relative.cmp(&b.relative));

    diff
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scanned(path: &str, mtime: i64) -> (String, ScannedFile) {
        (
            path.to_string(),
            ScannedFile {
                absolute: PathBuf::from(path),
                relative: path.to_string(),
                last_modified: mtime,
            },
        )
    }

    #[test]
    fn new_files_are_updates() {
        let scanned: HashMap<_, _> = [scanned("src/a.ts", 100)].into_iter().collect();
        let stored = HashMap::new();
        let diff = compute_diff(&scanned, &stored);
        assert_eq!(diff.to_update.len(), 1);
        assert!(diff.to_delete.is_empty());
    }

    #[test]
    fn missing_files_are_deletes() {
        let scanned = HashMap::new();
        let stored: HashMap<_, _> = [("src/a.ts".to_string(), "100".to_string())]
            .into_iter()
            .collect();
        let diff = compute_diff(&scanned, &stored);
        assert_eq!(diff.to_delete, vec!["src/a.ts".to_string()]);
    }

    #[test]
    fn unchanged_files_produce_empty_diff() {
        let scanned: HashMap<_, _> = [scanned("src/a.ts", 100)].into_iter().collect();
        let stored: HashMap<_, _> = [("src/a.ts".to_string(), "100".to_string())]
            .into_iter()
            .collect();
        let diff = compute_diff(&scanned, &stored);
        assert!(diff.to_update.is_empty());
        assert!(diff.to_delete.is_empty());
    }

    #[test]
    fn newer_mtime_is_stale() {
        let scanned: HashMap<_, _> = [scanned("src/a.ts", 200)].into_iter().collect();
        let stored: HashMap<_, _> = [("src/a.ts".to_string(), "100".to_string())]
            .into_iter()
            .collect();
        let diff = compute_diff(&scanned, &stored);
        assert_eq!(diff.to_update.len(), 1);
    }

    #[test]
    fn unparseable_freshness_is_stale() {
        let scanned: HashMap<_, _> = [scanned("src/a.ts", 100)].into_iter().collect();
        let stored: HashMap<_, _> = [("src/a.ts".to_string(), "deadbeef".to_string())]
            .into_iter()
            .collect();
        let diff = compute_diff(&scanned, &stored);
        assert_eq!(diff.to_update.len(), 1);
    }
}
