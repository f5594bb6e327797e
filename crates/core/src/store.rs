//! Atomic file replacement
//!
//! Every write goes to a temporary sibling of the target, is fsynced, and only then
//! renamed over the target. Until the rename the target is never touched, so a crash
//! leaves either the old content or the new content, never a mix.

use crate::error::{RcsError, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Suffix shared by every staged temp file
pub const TEMP_SUFFIX: &str = ".rcs-tmp";

/// A fully written temp file waiting to replace its target
///
/// Dropping a `StagedWrite` without calling [`StagedWrite::commit`] removes the temp
/// file and leaves the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    temp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedWrite {
    /// Path of the staged temp file
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Rename the temp file over the target
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.temp_path, &self.target)
            .map_err(|e| RcsError::io(&self.target, e))?;
        self.committed = true;

        // Fsync parent directory for durability
        if let Some(parent) = self.target.parent() {
            if let Ok(dir) = fs::File::open(parent) {
                let _ = dir.sync_all();
            }
        }

        tracing::debug!(path = %self.target.display(), "renamed staged write into place");
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = fs::remove_file(&self.temp_path) {
                tracing::warn!(
                    temp = %self.temp_path.display(),
                    "failed to remove abandoned temp file: {}",
                    e
                );
            }
        }
    }
}

/// Temp sibling name for `target`: `.<file name>.<uuid>.rcs-tmp`
pub fn temp_path_for(target: &Path) -> Result<PathBuf> {
    let name = target
        .file_name()
        .ok_or_else(|| {
            let e = io::Error::new(io::ErrorKind::InvalidInput, "target has no file name");
            RcsError::io(target, e)
        })?;
    let temp_name = format!(
        ".{}.{}{}",
        name.to_string_lossy(),
        uuid::Uuid::new_v4(),
        TEMP_SUFFIX
    );
    Ok(target.with_file_name(temp_name))
}

/// Whether a file name belongs to a staged write
pub fn is_temp_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(TEMP_SUFFIX)
}

/// Write `data` to a temp sibling of `target` and fsync it
///
/// On any failure the temp file is removed and the target is left as it was.
pub fn stage_write(target: &Path, data: &[u8]) -> Result<StagedWrite> {
    let temp_path = temp_path_for(target)?;

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| RcsError::io(parent, e))?;
        }
    }

    let mut file = fs::File::create(&temp_path).map_err(|e| RcsError::io(&temp_path, e))?;

    // From here on the guard owns cleanup of the temp file
    let staged = StagedWrite {
        temp_path,
        target: target.to_path_buf(),
        committed: false,
    };

    file.write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| RcsError::io(&staged.temp_path, e))?;
    drop(file);

    tracing::debug!(temp = %staged.temp_path.display(), bytes = data.len(), "staged write");
    Ok(staged)
}

/// Atomically replace `target` with `data`
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    stage_write(target, data)?.commit()
}
