//! Directory listing for versioned files

use rcs_core::store::is_temp_name;
use rcs_core::{RcsError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Names of the regular files directly inside `dir`, sorted
///
/// A missing directory yields an empty list. Staged temp files are skipped.
pub fn list_files(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RcsError::io(dir, e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RcsError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| RcsError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_temp_name(&name) {
            continue;
        }
        names.push(name);
    }

    names.sort();
    Ok(names)
}

/// Like [`list_files`], keeping only names matching the shell-style `mask`
pub fn list_files_matching(dir: &Path, mask: &str) -> Result<Vec<String>> {
    let pattern = glob::Pattern::new(mask).map_err(|e| RcsError::InvalidPattern {
        pattern: mask.to_string(),
        reason: e.to_string(),
    })?;

    let mut names = list_files(dir)?;
    names.retain(|name| pattern.matches(name));
    Ok(names)
}
