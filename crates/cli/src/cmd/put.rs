//! Commit a new version of a file

use crate::util;
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::io::Read;
use std::path::Path;

pub fn run(data_dir: &Path, name: &str, source: Option<&Path>, message: &str) -> Result<()> {
    let file = util::resolve_file(data_dir, name)?;

    let text = match source {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read text from stdin")?;
            text
        }
    };

    let version = file
        .put(&text, message)
        .with_context(|| format!("Failed to commit {}", name))?;

    println!("{}", version);
    eprintln!(
        "{} Committed {} {}",
        "✓".green(),
        name.yellow(),
        util::short_id(version.as_str()).cyan()
    );
    Ok(())
}
