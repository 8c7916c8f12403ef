//! Error types for ingestion and catalog maintenance.

use std::path::PathBuf;

use thiserror::Error;

/// The primary error type for catalog and text-record operations.
///
/// Every failure mode callers may want to branch on gets its own
/// variant; free-text matching on messages is not supported.
#[derive(Debug, Error)]
pub enum MutunError {
    /// A block in the source file has a line count that is neither 1
    /// (a heading) nor the configured language count.
    #[error("block {index} has {found} lines (expected 1 or {expected}): {lines:?}")]
    BlockArity {
        /// 1-based block position in the source file.
        index: usize,
        expected: usize,
        found: usize,
        lines: Vec<String>,
    },

    /// The catalog file exists but is not valid JSON for the expected
    /// schema. Not downgraded to an empty catalog unless the caller
    /// explicitly opts in via `Catalog::load_or_reset`.
    #[error("catalog {path} is not parseable: {source}")]
    CorruptCatalog {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A text record file exists but is not valid JSON.
    #[error("text record {path} is not parseable: {source}")]
    CorruptRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No catalog entry carries the requested id.
    #[error("no catalog entry with id '{id}'")]
    EntryNotFound { id: String },

    /// A per-language text file required for reconstruction is absent.
    #[error("missing text record: {path}")]
    MissingTextFile { path: PathBuf },

    /// The per-language text sequences for one item differ in length.
    #[error("line counts differ across languages for '{id}': {counts:?}")]
    LineCountMismatch {
        id: String,
        counts: Vec<(String, usize)>,
    },

    /// An underlying filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MutunError {
    /// Attach a path to a raw I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A convenience `Result` alias using [`MutunError`].
pub type Result<T> = std::result::Result<T, MutunError>;
