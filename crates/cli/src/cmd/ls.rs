//! List versioned files in the data directory

use anyhow::{Context, Result};
use std::path::Path;

pub fn run(data_dir: &Path, mask: Option<&str>) -> Result<()> {
    let names = match mask {
        Some(mask) => rcs_journal::list_files_matching(data_dir, mask),
        None => rcs_journal::list_files(data_dir),
    }
    .with_context(|| format!("Failed to list {}", data_dir.display()))?;

    for name in names {
        println!("{}", name);
    }
    Ok(())
}
