//! Remove leftovers of interrupted commits

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(data_dir: &Path) -> Result<()> {
    let removed = rcs_journal::cleanup_temp_files(data_dir)
        .with_context(|| format!("Failed to clean {}", data_dir.display()))?;

    if removed == 0 {
        println!("{}", "Nothing to recover".dimmed());
    } else {
        println!("{} Removed {} incomplete write(s)", "✓".green(), removed);
    }
    Ok(())
}
