//! Indexing configuration
//!
//! Tunables for the scan, ingestion scheduler, and coordinator. Loadable from
//! a TOML file; every field has a sensible default so hosts can pass
//! `IndexConfig::default()`.

use crate::error::{IndexError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a workspace index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Directories scanned first; falls back to the workspace root when none
    /// of these exist.
    pub include_dirs: Vec<String>,

    /// Whether paths under recognized test directories are indexed.
    pub include_tests: bool,

    /// Maximum file size to ingest (in bytes).
    pub max_file_size: u64,

    /// Files ingested per scheduler batch.
    pub batch_size: usize,

    /// Concurrently opened files while following imports during reference
    /// resolution.
    pub max_import_concurrency: usize,

    /// Deadline for a coordinated transaction, in milliseconds.
    pub transaction_timeout_ms: u64,

    /// Retry attempts for busy/locked store errors.
    pub max_retries: u32,

    /// Extra directory names excluded from the scan, on top of the built-in
    /// set.
    pub excluded_dirs: Vec<String>,

    /// Extra file extensions excluded from the scan.
    pub excluded_extensions: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            include_dirs: vec![
                "src".to_string(),
                "lib".to_string(),
                "app".to_string(),
                "core".to_string(),
            ],
            include_tests: false,
            max_file_size: 1024 * 1024, // 1MB
            batch_size: 10,
            max_import_concurrency: 5,
            transaction_timeout_ms: 30_000,
            max_retries: 3,
            excluded_dirs: vec![],
            excluded_extensions: vec![],
        }
    }
}

impl IndexConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| IndexError::IoFailure {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|e| IndexError::invalid_argument(format!(
            "invalid config file {}: {}",
            path.display(),
            e
        )))
    }

    /// Persist configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| IndexError::invalid_argument(format!("unserializable config: {}", e)))?;
        std::fs::write(path, raw).map_err(|source| IndexError::IoFailure {
            path: path.to_path_buf(),
            source,
        })
    }
}
