//! Check the integrity of a file's version chain

use crate::util;
use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(data_dir: &Path, name: &str) -> Result<()> {
    let file = util::resolve_file(data_dir, name)?;
    let report = file
        .verify()
        .with_context(|| format!("Failed to verify {}", name))?;

    if report.is_clean() {
        println!("{} {}: {}", "✓".green(), name, report.summary());
        Ok(())
    } else {
        println!("{} {}: {}", "✗".red(), name, report.summary());
        bail!("Integrity check failed for {}", name)
    }
}
