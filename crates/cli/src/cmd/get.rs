//! Print the latest or a historical version of a file

use crate::util;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

pub fn run(data_dir: &Path, name: &str, version: Option<&str>) -> Result<()> {
    let file = util::resolve_file(data_dir, name)?;

    let text = match version {
        None => file
            .get()
            .with_context(|| format!("Failed to read {}", name))?,
        Some(reference) => {
            let versions = file
                .list_versions()
                .with_context(|| format!("Failed to list versions of {}", name))?;
            let resolved = util::resolve_version(reference, &versions)?;
            file.get_version(&resolved)
                .with_context(|| format!("Failed to check out {} of {}", reference, name))?
        }
    };

    // Write verbatim, without adding a trailing newline
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
