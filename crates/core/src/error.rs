//! Error taxonomy shared by the storage crates

use std::path::PathBuf;

/// Errors surfaced by the versioned-file engine
#[derive(Debug, thiserror::Error)]
pub enum RcsError {
    /// Persisted record exists but cannot be parsed, or fails the integrity check
    #[error("corrupt record at {}: {reason}", path.display())]
    CorruptRecord { path: PathBuf, reason: String },

    /// Delta string was not produced by the encoder for this reference text
    #[error("malformed delta: {0}")]
    MalformedDelta(String),

    /// Delta could not be applied while committing or reconstructing a version
    #[error("delta failure: {0}")]
    DeltaFailure(String),

    /// Requested version is not on the chain
    #[error("unknown version: {0}")]
    UnknownVersion(String),

    /// Filesystem failure (temp file, rename, read, directory scan)
    #[error("I/O failure at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Record could not be encoded for writing
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// File-name mask is not a valid glob
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl RcsError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptRecord {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Codec errors reach engine callers as delta failures
    pub fn into_delta_failure(self) -> Self {
        match self {
            Self::MalformedDelta(msg) => Self::DeltaFailure(msg),
            other => other,
        }
    }
}

/// Result type used throughout the rcs crates
pub type Result<T> = std::result::Result<T, RcsError>;
