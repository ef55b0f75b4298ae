//! Error types for the indexing core
//!
//! This module provides structured error kinds using thiserror. Each kind maps
//! to one recovery policy: surfaced to the caller, retried with backoff,
//! transparently absorbed, or handled by resetting the store.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, IndexError>;

/// Main error type for indexing operations
#[derive(Error, Debug)]
pub enum IndexError {
    /// Caller handed us something unusable (empty query, empty workspace path,
    /// out-of-range position).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// A file disappeared between scan and ingestion. Logged and skipped.
    #[error("file not found: {path:?}")]
    NotFound { path: PathBuf },

    /// Read or stat failure on a source file. Logged and the file is skipped.
    #[error("failed to read {path:?}: {source}")]
    IoFailure {
        path: PathBuf,
        source: std::io::Error,
    },

    /// SQL failure outside a transaction. Surfaced.
    #[error("store operation failed: {cause}")]
    StoreFailure { cause: String },

    /// A nested transaction attempt. The coordinator falls through to direct
    /// execution when it sees this kind.
    #[error("cannot start a transaction within a transaction")]
    TransactionConflict,

    /// SQLite reported busy/locked. Retried with backoff, then surfaced.
    #[error("database is busy: {cause}")]
    BusyRetryable { cause: String },

    /// A coordinated transaction exceeded its deadline. Rolled back and
    /// surfaced.
    #[error("transaction timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Database file exists but its version marker is missing. The store is
    /// deleted and recreated.
    #[error("schema marker missing for {path:?}")]
    SchemaStale { path: PathBuf },

    /// `PRAGMA integrity_check` did not come back `ok`. The store is deleted
    /// and recreated.
    #[error("integrity check failed for {path:?}")]
    IntegrityFailure { path: PathBuf },

    /// The grammar for a file's language failed to load. The file is skipped.
    #[error("no parser available for language '{language}'")]
    ParserUnavailable { language: String },
}

impl IndexError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Whether the coordinator should retry this error with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::BusyRetryable { .. } | Self::TransactionConflict
        )
    }
}

impl From<rusqlite::Error> for IndexError {
    fn from(err: rusqlite::Error) -> Self {
        let text = err.to_string();
        let lowered = text.to_lowercase();
        if lowered.contains("cannot start a transaction within a transaction") {
            return Self::TransactionConflict;
        }
        if lowered.contains("database is locked") || lowered.contains("database is busy") {
            return Self::BusyRetryable { cause: text };
        }
        Self::StoreFailure { cause: text }
    }
}
