//! Handle to one versioned file
//!
//! Every call reloads the record from disk under the engine lock; nothing is cached
//! between calls.

use crate::guard;
use crate::record::{self, now_secs, IntegrityReport, VersionInfo};
use rcs_core::{Result, VersionId};
use std::path::{Path, PathBuf};

/// Versioned file at a filesystem path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedFile {
    path: PathBuf,
}

impl VersionedFile {
    /// Open a handle. Never touches the filesystem; a missing file reads as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Text of the latest version (empty if nothing was committed)
    pub fn get(&self) -> Result<String> {
        let _guard = guard::lock();
        let record = record::load(&self.path)?;
        Ok(record.current.data)
    }

    /// Commit `text` as the new latest version
    ///
    /// Either the advanced record is fully persisted or the file is left as it was.
    pub fn put(&self, text: &str, comment: &str) -> Result<VersionId> {
        let _guard = guard::lock();

        let mut record = record::load(&self.path)?;
        let version = record.commit(text, comment, now_secs())?;
        record::save(&self.path, &record)?;

        tracing::info!(
            path = %self.path.display(),
            version = %version,
            history = record.history.len(),
            "committed version"
        );
        Ok(version)
    }

    /// Reconstruct the text of an earlier (or the latest) version
    pub fn get_version(&self, version: &str) -> Result<String> {
        let _guard = guard::lock();
        let record = record::load(&self.path)?;
        record.reconstruct(version)
    }

    /// Metadata of every version, newest first
    pub fn list_versions(&self) -> Result<Vec<VersionInfo>> {
        let _guard = guard::lock();
        let record = record::load(&self.path)?;
        Ok(record.versions())
    }

    /// Full integrity check: chain structure plus reconstruction of every version
    ///
    /// Unlike the other operations this reports problems instead of failing on them;
    /// only unreadable or unparseable files are errors.
    pub fn verify(&self) -> Result<IntegrityReport> {
        let _guard = guard::lock();
        let record = record::load_unchecked(&self.path)?;

        let mut report = record.check_integrity();
        if report.dangling_parents.is_empty() && report.cycle_at.is_none() {
            record.verify_contents(&mut report);
        }

        if report.is_clean() {
            tracing::debug!(path = %self.path.display(), "verified: {}", report.summary());
        } else {
            tracing::warn!(path = %self.path.display(), "verify failed: {}", report.summary());
        }
        Ok(report)
    }
}
