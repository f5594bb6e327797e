//! Crash recovery
//!
//! A crash between staging a record and renaming it leaves a temp sibling behind.
//! The target itself is always intact, so recovery only has to delete the leftovers.

use rcs_core::store::is_temp_name;
use rcs_core::{RcsError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Delete staged temp files directly inside `dir`, returning how many were removed
///
/// Must not run while another process may be mid-save in the same directory.
pub fn cleanup_temp_files(dir: &Path) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(RcsError::io(dir, e)),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| RcsError::io(dir, e))?;
        let path = entry.path();
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);

        if is_file && is_temp_name(&entry.file_name().to_string_lossy()) {
            fs::remove_file(&path).map_err(|e| RcsError::io(&path, e))?;
            tracing::warn!(path = %path.display(), "removed incomplete write");
            removed += 1;
        }
    }

    Ok(removed)
}
