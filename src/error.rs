//! Error types for chronotrack.
//!
//! None of these are fatal to the engine. Store and persistence failures are
//! logged and the in-memory state carries on; lap and config errors are
//! recovered to defaults by their callers.

use std::path::PathBuf;

/// Failure of the underlying key-value store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure to save one persisted blob.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("writing {key} failed: {source}")]
    Write {
        key: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("serializing {key} failed: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The stored value could not be read, so it is not overwritten
    #[error("{key} could not be read, leaving it untouched")]
    Held { key: &'static str },
}

impl PersistError {
    pub fn key(&self) -> &'static str {
        match self {
            PersistError::Write { key, .. }
            | PersistError::Serialize { key, .. }
            | PersistError::Held { key } => key,
        }
    }
}

/// A lap sequence that breaks the ordering invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LapError {
    #[error("lap {index} has number {found}, expected {expected}")]
    OutOfSequence {
        index: usize,
        expected: u32,
        found: u32,
    },

    #[error("lap {number} total {total_ms}ms does not exceed previous total {previous_ms}ms")]
    NotIncreasing {
        number: u32,
        total_ms: u64,
        previous_ms: u64,
    },

    #[error("lap {number} split {lap_ms}ms does not match its totals")]
    SplitMismatch { number: u32, lap_ms: u64 },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O failed: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config malformed: {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
