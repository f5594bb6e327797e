//! Version chain engine
//!
//! This crate provides:
//! - The persisted version record (current text + reverse-delta history)
//! - Commit, checkout and log over the chain
//! - A process-wide lock serializing every operation
//! - Directory listing and crash recovery for versioned files

pub mod chain;
pub mod file;
pub mod guard;
pub mod listing;
pub mod record;
pub mod recovery;

// Re-exports
pub use file::VersionedFile;
pub use listing::{list_files, list_files_matching};
pub use rcs_core::{RcsError, Result, VersionId};
pub use record::{IntegrityReport, VersionEntry, VersionInfo, VersionRecord};
pub use recovery::cleanup_temp_files;

/// Open a handle to the versioned file at `path`
pub fn open(path: impl Into<std::path::PathBuf>) -> VersionedFile {
    VersionedFile::open(path)
}
